//! Per-section validators: model, generation, and document.

use std::sync::LazyLock;

use regex::Regex;

use crate::schema::CatalogConfig;

use super::helpers::{validate_non_empty, validate_range, validate_range_f64};

/// `type/subtype` with the token characters allowed by RFC 6838.
static MIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]*/[A-Za-z0-9][A-Za-z0-9!#$&^_.+-]*$").unwrap()
});

pub(crate) fn validate_model(errors: &mut Vec<String>, config: &CatalogConfig) {
    let model = &config.model;
    validate_non_empty(errors, "model.name", &model.name);
    if !(model.api_base.starts_with("https://") || model.api_base.starts_with("http://")) {
        errors.push(format!(
            "model.api_base = {:?} must be an http(s) URL",
            model.api_base
        ));
    }
    validate_range(
        errors,
        "model.connect_timeout_secs",
        model.connect_timeout_secs,
        1,
        300,
    );
    validate_range(
        errors,
        "model.request_timeout_secs",
        model.request_timeout_secs,
        1,
        3600,
    );
}

pub(crate) fn validate_generation(errors: &mut Vec<String>, config: &CatalogConfig) {
    let generation = &config.generation;
    validate_range_f64(
        errors,
        "generation.temperature",
        generation.temperature,
        0.0,
        2.0,
    );
    validate_range_f64(errors, "generation.top_p", generation.top_p, 0.0, 1.0);
    validate_range(
        errors,
        "generation.top_k",
        u64::from(generation.top_k),
        1,
        1000,
    );
    validate_range(
        errors,
        "generation.max_output_tokens",
        u64::from(generation.max_output_tokens),
        1,
        65536,
    );
    validate_non_empty(
        errors,
        "generation.system_instruction",
        &generation.system_instruction,
    );
}

pub(crate) fn validate_document(errors: &mut Vec<String>, config: &CatalogConfig) {
    let document = &config.document;
    if document.path.as_os_str().is_empty() {
        errors.push("document.path must not be empty".into());
    }
    if !MIME_RE.is_match(&document.mime_type) {
        errors.push(format!(
            "document.mime_type = {:?} is not a type/subtype pair",
            document.mime_type
        ));
    }
    validate_range(
        errors,
        "document.poll_interval_ms",
        document.poll_interval_ms,
        10,
        60_000,
    );
    validate_range(
        errors,
        "document.max_polls",
        u64::from(document.max_polls),
        1,
        600,
    );
}
