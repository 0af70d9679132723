use super::*;
use image::{GrayImage, Luma};

use crate::foundation::core::{MASK_BLANK, MASK_INK};

fn mask_from(rows: &[&[u8]]) -> GrayImage {
    let h = rows.len() as u32;
    let w = rows[0].len() as u32;
    let mut mask = GrayImage::from_pixel(w, h, Luma([MASK_BLANK]));
    for (y, row) in rows.iter().enumerate() {
        for (x, &v) in row.iter().enumerate() {
            if v == 1 {
                mask.put_pixel(x as u32, y as u32, Luma([MASK_INK]));
            }
        }
    }
    mask
}

#[test]
fn full_ink_mask_traces_to_its_bounding_rectangle() {
    let mask = mask_from(&[&[1, 1, 1], &[1, 1, 1]]);
    let doc = BorderTracer.trace(&mask).unwrap();
    let paths = extract_path_data(&doc);
    assert_eq!(paths, vec!["M0 0 L3 0 L3 2 L0 2 Z".to_string()]);
}

#[test]
fn blank_mask_produces_no_path_element() {
    let mask = GrayImage::from_pixel(3, 3, Luma([MASK_BLANK]));
    let doc = BorderTracer.trace(&mask).unwrap();
    assert!(extract_path_data(&doc).is_empty());
    // The document itself is still well formed.
    assert!(parse_view_box(&doc).is_ok());
}

#[test]
fn hole_becomes_a_second_loop() {
    let mask = mask_from(&[&[1, 1, 1], &[1, 0, 1], &[1, 1, 1]]);
    let doc = BorderTracer.trace(&mask).unwrap();
    let paths = extract_path_data(&doc);
    assert_eq!(paths.len(), 1);
    let d = &paths[0];
    assert_eq!(d.matches('M').count(), 2, "outer boundary plus hole: {d}");
    assert_eq!(d.matches('Z').count(), 2);
}

#[test]
fn disjoint_regions_become_separate_loops() {
    let mask = mask_from(&[&[1, 0, 1]]);
    let doc = BorderTracer.trace(&mask).unwrap();
    let d = extract_path_data(&doc).remove(0);
    assert_eq!(d.matches('M').count(), 2);
}

#[test]
fn view_box_matches_mask_dimensions() {
    let mask = mask_from(&[&[1, 1, 1, 1], &[1, 1, 1, 1]]);
    let doc = BorderTracer.trace(&mask).unwrap();
    assert_eq!(parse_view_box(&doc).unwrap(), (0.0, 0.0, 4.0, 2.0));
}

#[test]
fn empty_mask_is_a_trace_error() {
    let mask = GrayImage::new(0, 0);
    assert!(matches!(
        BorderTracer.trace(&mask),
        Err(BasvidError::Trace(_))
    ));
}

#[test]
fn extract_path_data_reads_every_path_element() {
    let svg = r#"<svg viewBox="0 0 1 1"><path d="M0 0 Z"/><g><path id="p2" d="M1 1 Z"/></g></svg>"#;
    assert_eq!(extract_path_data(svg), vec!["M0 0 Z", "M1 1 Z"]);
}

#[test]
fn parse_view_box_rejects_malformed_documents() {
    assert!(parse_view_box("<svg></svg>").is_err());
    assert!(parse_view_box("<svg viewBox=\"0 0 1\"></svg>").is_err());
    assert!(parse_view_box("<svg viewBox=\"0 0 one 1\"></svg>").is_err());
}
