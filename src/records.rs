//! Portal records and their conversion into a [`ReportModel`].
//!
//! Records come from the CRUD layer as JSON in whatever shape the row had.
//! Everything shape-dependent (missing fields, findings given as a string or
//! as a list) is resolved here, so layout only ever sees metadata rows and
//! plain text sections.

use serde::Deserialize;

use crate::model::{MetaField, ReportModel, TextSection};

const MISSING: &str = "-";

/// Findings as stored by different versions of the audit form.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Findings {
    Text(String),
    Items(Vec<FindingItem>),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FindingItem {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub value: String,
}

impl Findings {
    /// Canonical text form: the string itself, or one `label: value` line per item.
    pub fn to_text(&self) -> String {
        match self {
            Findings::Text(s) => s.clone(),
            Findings::Items(items) => items
                .iter()
                .filter(|it| !(it.label.trim().is_empty() && it.value.trim().is_empty()))
                .map(|it| {
                    if it.label.trim().is_empty() {
                        it.value.clone()
                    } else {
                        format!("{}: {}", it.label, it.value)
                    }
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub vehicle_reg: String,
    pub entity: Option<String>,
    pub inspector: Option<String>,
    /// Shown verbatim; formatting belongs to the caller.
    pub inspected_at: Option<String>,
    /// Free-form location; wins over `lat`/`lng`/`address` when present.
    pub location: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub address: Option<String>,
    pub odometer_km: Option<u64>,
    pub status: Option<String>,
    pub findings: Option<Findings>,
    pub notes: Option<String>,
}

fn or_missing(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => MISSING.to_string(),
    }
}

impl AuditRecord {
    /// Location line: explicit text, else coordinates (zero is a valid
    /// coordinate) with the address appended, else the address alone.
    fn location_text(&self) -> String {
        if let Some(loc) = self.location.as_deref().filter(|l| !l.trim().is_empty()) {
            return loc.trim().to_string();
        }
        let address = self.address.as_deref().map(str::trim).filter(|a| !a.is_empty());
        match (self.lat, self.lng, address) {
            (Some(lat), Some(lng), Some(addr)) => format!("{lat}, {lng} \u{2014} {addr}"),
            (Some(lat), Some(lng), None) => format!("{lat}, {lng}"),
            (_, _, Some(addr)) => addr.to_string(),
            _ => MISSING.to_string(),
        }
    }
}

impl From<AuditRecord> for ReportModel {
    fn from(audit: AuditRecord) -> Self {
        let metadata = vec![
            MetaField::new("Audit ID", or_missing(Some(audit.id.as_str()))),
            MetaField::new("Vehicle", or_missing(Some(audit.vehicle_reg.as_str()))),
            MetaField::new("Entity", or_missing(audit.entity.as_deref())),
            MetaField::new("Inspector", or_missing(audit.inspector.as_deref())),
            MetaField::new("Date", or_missing(audit.inspected_at.as_deref())),
            MetaField::new("Location", audit.location_text()),
            MetaField::new(
                "Odometer (km)",
                audit.odometer_km.map(group_thousands).unwrap_or_else(|| MISSING.to_string()),
            ),
            MetaField::new("Status", or_missing(audit.status.as_deref())),
        ];

        let findings = audit
            .findings
            .as_ref()
            .map(Findings::to_text)
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| MISSING.to_string());
        let mut sections = vec![TextSection::new("Findings", findings)];
        if let Some(notes) = audit.notes.as_deref().filter(|n| !n.trim().is_empty()) {
            sections.push(TextSection::new("Notes", notes));
        }

        ReportModel {
            id: audit.id.trim().to_string(),
            title: "Vehicle Audit Report".to_string(),
            created_at: audit.inspected_at.clone().unwrap_or_default(),
            metadata,
            sections,
            photos: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteVehicle {
    #[serde(default)]
    pub reg: String,
    #[serde(default)]
    pub vin: String,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    pub base_price: Option<f64>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct QuoteAccessory {
    pub name: String,
    pub price: Option<f64>,
}

/// A lease quotation. Monetary figures are computed upstream and only
/// formatted here.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    #[serde(default)]
    pub id: String,
    pub created_at: Option<String>,
    pub entity_id: Option<String>,
    pub customer_name: Option<String>,
    pub term_months: Option<u32>,
    pub limit_km: Option<u64>,
    pub rate_per_annum: Option<f64>,
    pub principal: Option<f64>,
    pub monthly: Option<f64>,
    #[serde(default)]
    pub vehicle: QuoteVehicle,
    #[serde(default)]
    pub accessories: Vec<QuoteAccessory>,
}

impl From<QuoteRecord> for ReportModel {
    fn from(q: QuoteRecord) -> Self {
        let money = |v: Option<f64>| v.map(format_rand).unwrap_or_else(|| MISSING.to_string());
        let make_model = format!("{} {}", q.vehicle.make.trim(), q.vehicle.model.trim());

        let metadata = vec![
            MetaField::new("Quote ID", or_missing(Some(q.id.as_str()))),
            MetaField::new("Customer", or_missing(q.customer_name.as_deref())),
            MetaField::new("Entity", or_missing(q.entity_id.as_deref())),
            MetaField::new(
                "Term",
                q.term_months.map(|m| format!("{m} months")).unwrap_or_else(|| MISSING.to_string()),
            ),
            MetaField::new(
                "Limit",
                q.limit_km
                    .map(|km| format!("{} km", group_thousands(km)))
                    .unwrap_or_else(|| MISSING.to_string()),
            ),
            MetaField::new(
                "Rate (p.a.)",
                q.rate_per_annum.map(|r| format!("{r}%")).unwrap_or_else(|| MISSING.to_string()),
            ),
            MetaField::new("Principal", money(q.principal)),
            MetaField::new("Monthly", money(q.monthly)),
            MetaField::new("Reg", or_missing(Some(q.vehicle.reg.as_str()))),
            MetaField::new("VIN", or_missing(Some(q.vehicle.vin.as_str()))),
            MetaField::new("Make/Model", or_missing(Some(make_model.as_str()))),
            MetaField::new("Base Price", money(q.vehicle.base_price)),
        ];

        let accessories = if q.accessories.is_empty() {
            "None".to_string()
        } else {
            q.accessories
                .iter()
                .map(|a| format!("\u{2022} {} \u{2014} {}", a.name, money(a.price)))
                .collect::<Vec<_>>()
                .join("\n")
        };

        ReportModel {
            id: q.id.trim().to_string(),
            title: "Lease Quotation".to_string(),
            created_at: q.created_at.unwrap_or_default(),
            metadata,
            sections: vec![TextSection::new("Accessories", accessories)],
            photos: Vec::new(),
        }
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `R 1,234,567.89`. Negative amounts keep their sign in front of the symbol.
fn format_rand(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R {}.{:02}", group_thousands(cents / 100), cents % 100)
}
