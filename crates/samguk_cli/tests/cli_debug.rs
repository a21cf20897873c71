mod common;

use std::fs;

use common::{run_cli, sample_image, temp_output_path, write_sample_save};
use samguk_core::layout::LAYOUT_END;
use serde_json::Value;

fn json_of(output: &std::process::Output) -> Value {
    let stdout = String::from_utf8_lossy(&output.stdout);
    serde_json::from_str(&stdout).expect("stdout should be valid JSON")
}

#[test]
fn debug_layout_json_reports_sections() {
    let path = write_sample_save("samguk_debug_layout");
    let path_s = path.to_string_lossy().to_string();

    let output = run_cli(&["debug", "layout", "--json", &path_s]);
    assert!(output.status.success());

    let json = json_of(&output);
    assert_eq!(json["validation_ok"], true);
    assert_eq!(json["file_len"], LAYOUT_END);
    let sections = json["sections"]
        .as_array()
        .expect("sections should be an array");
    assert_eq!(sections.len(), json["section_count"].as_u64().unwrap_or_default() as usize);
    assert_eq!(sections[0]["id"], "header");
    assert_eq!(sections[0]["ciphered"], false);

    let generals = sections
        .iter()
        .find(|s| s["id"] == "generals")
        .expect("generals section");
    assert_eq!(generals["start"], 0x40);
    assert_eq!(generals["len"], 620 * 120);
    assert_eq!(generals["ciphered"], true);

    let trailer = sections.last().expect("trailer section");
    assert_eq!(trailer["id"], "trailer");
    assert_eq!(trailer["len"], 0);

    let _ = fs::remove_file(&path);
}

#[test]
fn debug_record_json_dumps_decrypted_fields() {
    let path = write_sample_save("samguk_debug_record");
    let path_s = path.to_string_lossy().to_string();

    let output = run_cli(&[
        "debug", "record", "--kind", "city", "--index", "39", "--json", &path_s,
    ]);
    assert!(output.status.success());

    let json = json_of(&output);
    assert_eq!(json["kind"], "city");
    assert_eq!(json["index"], 39);
    assert_eq!(json["offset"], 0x15190 + 39 * 64);
    assert_eq!(json["fields"]["gold"], 3_000);
    assert_eq!(json["fields"]["realm"], 0);
    assert_eq!(json["fields"]["governor"], 0);

    let _ = fs::remove_file(&path);
}

#[test]
fn debug_record_text_prints_name_value_lines() {
    let path = write_sample_save("samguk_debug_record_text");
    let path_s = path.to_string_lossy().to_string();

    let output = run_cli(&["debug", "record", "--kind", "general", "--index", "1", &path_s]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("general 1 at 0x000b8"));
    assert!(stdout.lines().any(|l| l == "loyalty=90"));
    assert!(stdout.lines().any(|l| l == "realm=0"));

    let _ = fs::remove_file(&path);
}

#[test]
fn debug_record_rejects_out_of_range_slot() {
    let path = write_sample_save("samguk_debug_record_range");
    let path_s = path.to_string_lossy().to_string();

    let output = run_cli(&["debug", "record", "--kind", "item", "--index", "72", &path_s]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("item slot 72 is out of range"));

    let _ = fs::remove_file(&path);
}

#[test]
fn debug_validate_reports_ok_with_snapshot() {
    let path = write_sample_save("samguk_debug_validate_ok");
    let path_s = path.to_string_lossy().to_string();

    let output = run_cli(&["debug", "validate", "--json", &path_s]);
    assert!(output.status.success());

    let json = json_of(&output);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["errors"].as_array().map(Vec::len), Some(0));
    assert_eq!(json["snapshot"]["player_name"], "孫堅");
    assert_eq!(json["snapshot"]["active_realm_count"], 1);

    let _ = fs::remove_file(&path);
}

#[test]
fn debug_validate_reports_error_for_truncated_save() {
    let truncated_path = temp_output_path("samguk_debug_truncated");
    fs::write(&truncated_path, &sample_image()[..128]).expect("truncated file should be writable");

    let truncated = truncated_path.to_string_lossy().to_string();
    let output = run_cli(&["debug", "validate", "--json", &truncated]);
    assert!(!output.status.success());

    let json = json_of(&output);
    assert_eq!(json["status"], "error");
    assert_eq!(json["file_len"], 128);
    let errors = json["errors"].as_array().expect("errors should be array");
    assert!(!errors.is_empty());
    assert!(
        errors[0]
            .as_str()
            .unwrap_or_default()
            .contains("truncated")
    );

    let _ = fs::remove_file(&truncated_path);
}

#[test]
fn debug_layout_counts_trailer_bytes() {
    let path = temp_output_path("samguk_debug_trailer");
    let mut image = sample_image();
    image.extend_from_slice(&[1, 2, 3]);
    fs::write(&path, &image).expect("write");
    let path_s = path.to_string_lossy().to_string();

    let output = run_cli(&["debug", "layout", "--json", &path_s]);
    assert!(output.status.success());

    let json = json_of(&output);
    let sections = json["sections"].as_array().expect("sections");
    let trailer = sections.last().expect("trailer");
    assert_eq!(trailer["start"], LAYOUT_END);
    assert_eq!(trailer["len"], 3);
    assert_eq!(json["validation_ok"], true);

    let _ = fs::remove_file(&path);
}
