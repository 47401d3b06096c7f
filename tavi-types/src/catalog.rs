//! The TAVI pre-procedural CT field catalogue.
//!
//! Entry order follows the order measurements are taken on the workstation;
//! the report layout follows the order the receiving template expects.

use crate::schema::{FieldDescriptor, FieldKind, FieldSchema, ReportItem};

const SIDES: [(&str, &str); 2] = [("rt", "Rt."), ("lt", "Lt.")];
const ILIOFEMORAL: [&str; 6] = ["pcia", "mcia", "dcia", "peia", "meia", "cfa"];
const SUBCLAVIAN: [&str; 3] = ["dsca", "msca", "psca"];
const BOUNDS: [&str; 2] = ["min", "max"];

/// Builds the TAVI CT schema.
///
/// # Panics
///
/// Never in practice: the catalogue is static and covered by tests. A broken
/// catalogue is a programming error and fails loudly at startup.
#[must_use]
pub fn tavi_schema() -> FieldSchema {
    match FieldSchema::new(fields(), layout()) {
        Ok(schema) => schema,
        Err(e) => panic!("built-in TAVI catalogue is invalid: {e}"),
    }
}

fn length(key: impl Into<String>, label: &str, order: u32, max: f64) -> FieldDescriptor {
    let key: String = key.into();
    FieldDescriptor::new(key, label, FieldKind::Decimal, order)
        .with_unit("mm")
        .with_range(0.0, max)
        .with_form_label(format!("{} (mm)", label.trim_end()))
}

fn angle(key: &str, label: &str, form_label: &str, order: u32) -> FieldDescriptor {
    FieldDescriptor::new(key, label, FieldKind::Decimal, order)
        .with_unit("deg.")
        .with_range(-180.0, 180.0)
        .with_form_label(form_label)
}

fn vessel_keys(vessels: &[&str]) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for (side, side_label) in SIDES {
        for vessel in vessels {
            for bound in BOUNDS {
                out.push((
                    format!("{side}_{vessel}_{bound}"),
                    format!("{side_label}{} {bound}", vessel.to_uppercase()),
                ));
            }
        }
    }
    out
}

fn fields() -> Vec<FieldDescriptor> {
    let mut fields = vec![
        FieldDescriptor::new("case_name", "症例識別名", FieldKind::Text, 0),
        FieldDescriptor::new("analyst", "解析者", FieldKind::Text, 1),
        FieldDescriptor::new("phases_a", "phases", FieldKind::Integer, 2).with_form_label("ES phase"),
        FieldDescriptor::new("phases_b", "phases", FieldKind::Integer, 3).with_form_label("ED phase"),
        FieldDescriptor::new("ca_score", "Ca score", FieldKind::Decimal, 4),
        FieldDescriptor::new("annulus_area", "annulus area", FieldKind::Decimal, 5)
            .with_unit("mm2")
            .with_range(0.0, 1000.0)
            .with_form_label("annulus area (mm²)"),
        length("annulus_peri", "annulus peri", 6, 200.0),
        length("annulus_min", "annulus min", 7, 100.0),
        length("annulus_max", "annulus max", 8, 100.0),
        angle("perpen_lr", "perpen L/R", "perpen L/R (deg.)", 9),
        angle("perpen_crca", "perpen Cr/Ca", "perpen cra/cau (deg.)", 10),
        angle("rootangle", "rootangle", "rootangle (deg.)", 11),
        length("rca_ht", "RCA Ht.", 12, 100.0),
        length("rcc_ht", "RCC Ht. ", 13, 100.0),
        length("ncc_ht", "NCC Ht.", 14, 100.0),
        length("lca_ht", "LCA Ht.", 15, 100.0),
        length("lcc_ht", "LCC Ht. ", 16, 100.0),
        length("ms_oblique", "MS oblique", 17, 100.0),
        length("ms_stretch", "MS stretch", 18, 100.0),
        length("stj_min", "STJ min", 19, 100.0),
        length("stj_max", "STJ max", 20, 100.0),
        length("sov_r", "SOV diameter R", 21, 100.0).with_form_label("SOV R (mm)"),
        length("sov_n", "SOV diameter N", 22, 100.0).with_form_label("SOV N (mm)"),
        length("sov_l", "SOV diameter L", 23, 100.0).with_form_label("SOV L (mm)"),
    ];

    let mut order = 24;
    for (key, label) in vessel_keys(&ILIOFEMORAL) {
        fields.push(length(key, &label, order, 50.0));
        order += 1;
    }
    fields.push(length("tao_2ndic", "TAo 2ndIC", order, 100.0));
    fields.push(length("tao_3rdic", "TAo 3rdIC", order + 1, 100.0));
    order += 2;
    for (key, label) in vessel_keys(&SUBCLAVIAN) {
        fields.push(length(key, &label, order, 50.0));
        order += 1;
    }
    fields
}

fn layout() -> Vec<ReportItem> {
    let mut items = vec![ReportItem::field("analyst"), ReportItem::pair("phases", "phases_a", "phases_b")];
    items.extend(
        ["ca_score", "annulus_area", "annulus_peri", "annulus_min", "annulus_max"]
            .into_iter()
            .map(ReportItem::field),
    );
    items.push(ReportItem::blank(4));
    items.extend(
        [
            "stj_min", "stj_max", "sov_l", "sov_r", "sov_n", "lcc_ht", "rcc_ht", "ncc_ht", "lca_ht",
            "rca_ht",
        ]
        .into_iter()
        .map(ReportItem::field),
    );
    items.push(ReportItem::blank(2));
    items.extend(
        ["ms_oblique", "ms_stretch", "perpen_lr", "perpen_crca", "rootangle"]
            .into_iter()
            .map(ReportItem::field),
    );

    // One block per side of the iliofemoral run.
    let iliofemoral = vessel_keys(&ILIOFEMORAL);
    for side in iliofemoral.chunks(ILIOFEMORAL.len() * BOUNDS.len()) {
        items.push(ReportItem::blank(1));
        items.extend(side.iter().map(|(key, _)| ReportItem::field(key)));
    }

    items.push(ReportItem::blank(1));
    items.push(ReportItem::field("tao_2ndic"));
    items.push(ReportItem::field("tao_3rdic"));
    items.extend(
        vessel_keys(&SUBCLAVIAN)
            .iter()
            .map(|(key, _)| ReportItem::field(key)),
    );
    items
}
