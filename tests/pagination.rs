mod common;

use fleet_report::{RenderOptions, ReportModel, WrapMetric};

const BOTTOM_MARGIN: f32 = 80.0;
const FOOTER_Y: f32 = 40.0;
const CONTENT_TOP: f32 = 780.0;

fn opts_with_wrap(chars: usize) -> RenderOptions {
    RenderOptions {
        wrap_chars: chars,
        ..RenderOptions::default()
    }
}

#[test]
fn short_body_wraps_to_six_lines_on_one_page() {
    common::init_logging();
    let body = common::words(50);
    assert_eq!(body.len(), 500);

    let report = ReportModel::new("A-10", "Vehicle Audit Report").with_section("Findings", body);
    let outcome =
        fleet_report::render_report_with_outcome(&report, None, &opts_with_wrap(90)).unwrap();
    assert_eq!(outcome.text_lines, 6);
    assert_eq!(outcome.page_count, 1);
}

#[test]
fn long_body_continues_on_second_page() {
    common::init_logging();
    let report = ReportModel::new("A-11", "Vehicle Audit Report")
        .with_section("Findings", common::words(600));
    let outcome =
        fleet_report::render_report_with_outcome(&report, None, &opts_with_wrap(90)).unwrap();
    assert_eq!(outcome.text_lines, 67);
    assert_eq!(outcome.page_count, 2);

    let pages = common::page_contents(&outcome.bytes);
    let first_body = |page: &str| {
        common::text_runs(page)
            .into_iter()
            .find(|r| r.text.starts_with("abcdefghi"))
            .unwrap()
    };
    // Continuation starts at the top of the content area, under the banner.
    assert_eq!(first_body(&pages[1]).y, CONTENT_TOP - 10.0);
    assert!(first_body(&pages[0]).y < first_body(&pages[1]).y);
}

#[test]
fn banner_is_redrawn_on_every_page() {
    let report = ReportModel::new("A-12", "Vehicle Audit Report")
        .with_section("Findings", common::words(1500));
    let outcome =
        fleet_report::render_report_with_outcome(&report, None, &RenderOptions::default()).unwrap();
    assert!(outcome.page_count >= 3);

    for page in common::page_contents(&outcome.bytes) {
        let banner = common::text_runs(&page)
            .into_iter()
            .find(|r| r.text.starts_with("AFRIRENT"))
            .expect("banner title on page");
        assert!(banner.y > CONTENT_TOP);
        assert!(page.contains(" re\n"), "banner background missing");
    }
}

#[test]
fn nothing_drawn_below_bottom_margin_except_footer() {
    let mut report = ReportModel::new("A-13", "Vehicle Audit Report");
    for i in 0..30 {
        report = report.with_meta(format!("Field {i}"), common::words(i % 7 + 1));
    }
    for i in 0..6 {
        report = report.with_section(format!("Section {i}"), common::words(40 + i * 55));
    }
    let outcome =
        fleet_report::render_report_with_outcome(&report, None, &RenderOptions::default()).unwrap();
    assert!(outcome.page_count > 1);

    for page in common::page_contents(&outcome.bytes) {
        for run in common::text_runs(&page) {
            if run.y == FOOTER_Y {
                continue;
            }
            assert!(run.y >= BOTTOM_MARGIN, "{run:?} below bottom margin");
        }
    }
}

#[test]
fn heading_never_stranded_at_page_bottom() {
    // 47 lines leave 18pt after the section gap: room for the heading but
    // not for the heading and its first line.
    let first: Vec<String> = (0..47).map(|i| format!("line {i}")).collect();
    let report = ReportModel::new("A-14", "Vehicle Audit Report")
        .with_section("First", first.join("\n"))
        .with_section("Second", "follows the heading");
    let bytes = fleet_report::render_report(&report, None).unwrap();
    let pages = common::page_contents(&bytes);
    assert_eq!(pages.len(), 2);

    let p1 = common::texts(&pages[0]);
    let p2 = common::texts(&pages[1]);
    assert!(p1.contains(&"line 46".to_string()));
    assert!(!p1.contains(&"Second".to_string()));
    let heading = p2.iter().position(|t| t == "Second").unwrap();
    assert_eq!(p2[heading + 1], "follows the heading");
}

#[test]
fn explicit_newlines_are_kept() {
    let report = ReportModel::new("A-15", "Vehicle Audit Report")
        .with_section("Findings", "Mirror cracked\n\nTyres worn\r\nWipers ok");
    let outcome =
        fleet_report::render_report_with_outcome(&report, None, &RenderOptions::default()).unwrap();
    assert_eq!(outcome.text_lines, 4);

    let texts = common::texts(&common::page_contents(&outcome.bytes)[0]);
    let start = texts.iter().position(|t| t == "Mirror cracked").unwrap();
    assert_eq!(texts[start + 1], "Tyres worn");
    assert_eq!(texts[start + 2], "Wipers ok");
}

#[test]
fn glyph_wrap_keeps_lines_inside_usable_width() {
    let opts = RenderOptions {
        wrap_metric: WrapMetric::Helvetica,
        ..RenderOptions::default()
    };
    let body = "mmmm wwww ".repeat(60) + "\n" + &"iiii llll ".repeat(60);
    let report = ReportModel::new("A-16", "Vehicle Audit Report").with_section("Findings", body);
    let outcome = fleet_report::render_report_with_outcome(&report, None, &opts).unwrap();

    let page = &common::page_contents(&outcome.bytes)[0];
    let texts = common::texts(page);
    let longest = |prefix: &[&str]| {
        texts
            .iter()
            .filter(|t| prefix.iter().any(|p| t.starts_with(p)))
            .map(|t| t.len())
            .max()
            .unwrap()
    };
    // Width-based wrapping packs far more narrow glyphs into a line than wide ones.
    let wide = longest(&["mmmm", "wwww"]);
    let narrow = longest(&["iiii", "llll"]);
    assert!(wide < 92, "wide line of {wide} chars");
    assert!(narrow > 92, "narrow line of {narrow} chars");
}
