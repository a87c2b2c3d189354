#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;

use fleet_report::ReportModel;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn png(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbImage::from_fn(w, h, |x, y| image::Rgb([(x * 7) as u8, (y * 5) as u8, 90]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub fn png_with_alpha(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba([10, 200, 30, 100]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub fn jpeg(w: u32, h: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(w, h, image::Rgb([240, 120, 30]));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Jpeg).unwrap();
    buf.into_inner()
}

/// `n` space-separated nine-letter words: `10 * n` characters including spaces.
pub fn words(n: usize) -> String {
    vec!["abcdefghi"; n].join(" ") + " "
}

pub fn sample_report() -> ReportModel {
    ReportModel::new("A-1001", "Vehicle Audit Report")
        .with_created_at("2025-01-14 14:33")
        .with_meta("Audit ID", "A-1001")
        .with_meta("Vehicle", "CA 123-456")
        .with_meta("Inspector", "T. Mokoena")
        .with_section("Findings", "Left mirror cracked.\nTyres at 4mm.")
}

/// A fresh directory under the system temp dir, unique per test name.
pub fn scratch_dir(test: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("fleet-report-tests")
        .join(format!("{test}-{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub struct Stream {
    pub dict: String,
    pub data: Vec<u8>,
}

fn find(hay: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    hay.get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn rfind(hay: &[u8], needle: &[u8], before: usize) -> Option<usize> {
    hay[..before].windows(needle.len()).rposition(|w| w == needle)
}

/// Every stream object in file order, with its dictionary source text.
pub fn streams(pdf: &[u8]) -> Vec<Stream> {
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some(at) = find(pdf, b"stream\n", pos) {
        pos = at + 7;
        if at >= 3 && &pdf[at - 3..at] == b"end" {
            continue;
        }
        let dict_start = rfind(pdf, b" obj", at).unwrap_or(0);
        let dict = String::from_utf8_lossy(&pdf[dict_start..at]).into_owned();
        let len: usize = dict
            .split("/Length ")
            .nth(1)
            .and_then(|s| s.split_whitespace().next())
            .and_then(|s| s.parse().ok())
            .unwrap();
        out.push(Stream {
            dict,
            data: pdf[pos..pos + len].to_vec(),
        });
        pos += len;
    }
    out
}

/// Decompressed page content streams in page order.
pub fn page_contents(pdf: &[u8]) -> Vec<String> {
    streams(pdf)
        .into_iter()
        .filter(|s| !s.dict.contains("/Image"))
        .map(|s| {
            let raw = miniz_oxide::inflate::decompress_to_vec_zlib(&s.data).unwrap();
            String::from_utf8_lossy(&raw).into_owned()
        })
        .collect()
}

pub fn image_streams(pdf: &[u8]) -> Vec<Stream> {
    streams(pdf)
        .into_iter()
        .filter(|s| s.dict.contains("/Image"))
        .collect()
}

fn decode_pdf_string(operand: &str) -> String {
    let operand = operand.trim();
    if let Some(hex) = operand.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
        let hex: Vec<u8> = hex.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
        return hex
            .chunks(2)
            .filter_map(|pair| u8::from_str_radix(std::str::from_utf8(pair).ok()?, 16).ok())
            .map(char::from)
            .collect();
    }
    let inner = operand
        .strip_prefix('(')
        .and_then(|s| s.strip_suffix(')'))
        .unwrap_or(operand);
    let mut out = String::new();
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// A shown string with the text position it was drawn at.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub text: String,
}

pub fn text_runs(content: &str) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let (mut x, mut y) = (0.0, 0.0);
    for line in content.lines() {
        if let Some(args) = line.strip_suffix(" Td") {
            let nums: Vec<f32> = args.split_whitespace().filter_map(|s| s.parse().ok()).collect();
            if nums.len() == 2 {
                (x, y) = (nums[0], nums[1]);
            }
        } else if let Some(operand) = line.strip_suffix(" Tj") {
            runs.push(TextRun {
                x,
                y,
                text: decode_pdf_string(operand),
            });
        }
    }
    runs
}

pub fn texts(content: &str) -> Vec<String> {
    text_runs(content).into_iter().map(|r| r.text).collect()
}

/// `[w, 0, 0, h, x, y]` of every image drawn, in drawing order.
pub fn image_boxes(content: &str) -> Vec<[f32; 6]> {
    let lines: Vec<&str> = content.lines().collect();
    let mut boxes = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        if !line.ends_with(" Do") {
            continue;
        }
        let Some(cm) = lines[..i].iter().rev().find(|l| l.ends_with(" cm")) else {
            continue;
        };
        let nums: Vec<f32> = cm.split_whitespace().filter_map(|s| s.parse().ok()).collect();
        if nums.len() == 6 {
            boxes.push([nums[0], nums[1], nums[2], nums[3], nums[4], nums[5]]);
        }
    }
    boxes
}

/// Image boxes excluding the banner logo (which sits above the content area).
pub fn photo_boxes(content: &str, content_top: f32) -> Vec<[f32; 6]> {
    image_boxes(content)
        .into_iter()
        .filter(|b| b[5] < content_top)
        .collect()
}
