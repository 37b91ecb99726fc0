//! Name and company hints read from the text around an address.
//!
//! Patterns are tried in order and the first usable capture wins.

use once_cell::sync::Lazy;
use regex::Regex;

static NAME_BEFORE_SEPARATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Z][a-z]+\s+[A-Z][a-z]+)\s*[-–:]\s*$")
        .expect("Name-before-separator regex pattern is valid and should compile")
});
static NAME_ADJACENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Z][a-z]+\s+[A-Z][a-z]+)\s*$").expect("Adjacent name regex pattern is valid and should compile")
});
static NAME_LABELLED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:name|contact|from|author)[ \t:]+([A-Z][a-zA-Z]*(?:[ \t]+[A-Z][a-zA-Z]*)*)")
        .expect("Labelled name regex pattern is valid and should compile")
});
static NAME_HONORIFIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b((?:Dr|Mr|Ms|Mrs)\.?\s+[A-Z][a-z]+\s+[A-Z][a-z]+)")
        .expect("Honorific name regex pattern is valid and should compile")
});

static COMPANY_LABELLED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?i:company|organization|org|corp|inc|ltd)[ \t:]+([A-Z][A-Za-z]*(?:[ \t]+[A-Z][A-Za-z]*)*)")
        .expect("Labelled company regex pattern is valid and should compile")
});
static COMPANY_SUFFIXED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Z][A-Za-z]+(?:[ \t]+[A-Z][A-Za-z]+)*)[ \t]+(?:Pvt\.?[ \t]+Ltd\b\.?|Inc\b\.?|Corp\b\.?|LLC\b|Ltd\b\.?)")
        .expect("Suffixed company regex pattern is valid and should compile")
});

/// Public mail providers; their domains say nothing about an employer.
const COMMON_PROVIDERS: &[&str] = &[
    "gmail.com",
    "yahoo.com",
    "hotmail.com",
    "outlook.com",
    "icloud.com",
    "aol.com",
    "mail.com",
    "protonmail.com",
];

/// Find a person's name in the text preceding an address.
pub fn name_hint(before: &str) -> Option<String> {
    [&NAME_BEFORE_SEPARATOR, &NAME_ADJACENT, &NAME_LABELLED, &NAME_HONORIFIC]
        .iter()
        .find_map(|pattern| {
            pattern
                .captures(before)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().trim())
                .filter(|name| name.chars().count() > 2)
                .map(str::to_string)
        })
}

/// Find an organisation name around an address, falling back to the domain.
pub fn company_hint(before: &str, after: &str, address: &str) -> Option<String> {
    let context = format!("{} {}", before, after);

    let from_context = [&COMPANY_LABELLED, &COMPANY_SUFFIXED].iter().find_map(|pattern| {
        pattern
            .captures(&context)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|company| company.chars().count() > 2)
            .map(str::to_string)
    });

    from_context.or_else(|| company_from_domain(address))
}

/// `acme-labs.co.uk` becomes `Acme Labs`; common public providers yield nothing.
pub fn company_from_domain(address: &str) -> Option<String> {
    let (_, domain) = address.split_once('@')?;
    if COMMON_PROVIDERS.contains(&domain) {
        return None;
    }

    let label = domain.split('.').next()?;
    if label.chars().count() <= 2 {
        return None;
    }

    Some(title_case(&label.replace(['-', '_'], " ")))
}

fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
