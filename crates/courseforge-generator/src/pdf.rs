//! PDF template selection from filename keywords
//!
//! The filename is lowercased and each rule in the catalog is tested in order. A keyword
//! counts only where it is not part of a longer keyword from the same rule table, so
//! `data` inside `database` does not pull a database document into the python rule.

use crate::catalog::PdfCatalog;

/// Pick the PDF template key for a filename
pub fn select_template_key<'a>(catalog: &'a PdfCatalog, filename: &str) -> &'a str {
    let haystack = filename.to_lowercase();
    let all_keywords: Vec<&str> = catalog
        .rules
        .iter()
        .flat_map(|rule| rule.keywords.iter().map(String::as_str))
        .collect();

    catalog
        .rules
        .iter()
        .find(|rule| {
            rule.keywords
                .iter()
                .any(|keyword| has_unshadowed_match(&haystack, keyword, &all_keywords))
        })
        .map(|rule| rule.template.as_str())
        .unwrap_or(catalog.fallback.as_str())
}

/// Course title for a PDF: `"<template title> - <filename without its final extension>"`
pub fn course_title(template_title: &str, filename: &str) -> String {
    format!("{} - {}", template_title, strip_extension(filename))
}

/// Drop the final `.ext` from a filename; dotfiles and extensionless names are kept whole
pub fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => filename,
    }
}

fn has_unshadowed_match(haystack: &str, keyword: &str, all_keywords: &[&str]) -> bool {
    let longer: Vec<&str> = all_keywords
        .iter()
        .copied()
        .filter(|other| other.len() > keyword.len() && other.contains(keyword))
        .collect();

    match_starts(haystack, keyword).any(|start| {
        let end = start + keyword.len();
        !longer.iter().any(|other| {
            match_starts(haystack, other)
                .any(|outer| outer <= start && end <= outer + other.len())
        })
    })
}

/// Byte offsets of every (possibly overlapping) occurrence of `needle`
fn match_starts<'h>(haystack: &'h str, needle: &'h str) -> impl Iterator<Item = usize> + 'h {
    haystack
        .char_indices()
        .map(|(i, _)| i)
        .filter(move |&i| haystack[i..].starts_with(needle))
}
