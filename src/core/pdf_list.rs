use std::collections::HashSet;

use regex::Regex;
use thiserror::Error;

use crate::models::{EntryType, SanctionsEntry};

#[derive(Debug, Error)]
pub enum PdfListError {
    #[error("Failed to extract PDF text: {0}")]
    Extract(#[from] pdf_extract::OutputError),
}

/// Parser for the consolidated sanctions list PDF rendition.
///
/// Entries are located by their reference headers ("QDi.123 Nom:"), sliced at
/// the next header and mined with per-field label patterns. French labels are
/// primary; the English variants appear in mixed documents.
pub struct PdfListParser {
    entity_header: Regex,
    person_header: Regex,
    embedded_id: Regex,
    name: Regex,
    original_script: Regex,
    other_names: Regex,
    previously_known: Regex,
    title: Regex,
    designation: Regex,
    date_of_birth: Regex,
    place_of_birth: Regex,
    reliable_alias: Regex,
    unreliable_alias: Regex,
    letter_marker: Regex,
    nationality: Regex,
    passport: Regex,
    passport_alt: Regex,
    national_id: Regex,
    national_id_alt: Regex,
    entity_name: Regex,
    entity_nationality: Regex,
    list_split: Regex,
}

struct HeaderMatch {
    id: String,
    start: usize,
}

impl PdfListParser {
    pub fn new() -> Self {
        Self {
            entity_header: Regex::new(r"([A-Z]{2}e)\.(\d{3})\s+(?:Nom|Name):").unwrap(),
            person_header: Regex::new(r"([A-Z]{2}i)\.(\d{3})\s+(?:Nom|Name):").unwrap(),
            embedded_id: Regex::new(r"\b[A-Z]{2,3}\.\d+\b").unwrap(),
            name: Regex::new(
                r"(?is)(?:Nom|Name):\s*(.+?)\s*(?:Nom \(alphabet d'origine\)|Original script|Titre|Title|Désignation|Designation|Date de naissance|Date of birth|Lieu de naissance|Place of birth|Pseudonyme|A\.k\.a\.|Nationalité|Nationality|$)",
            )
            .unwrap(),
            original_script: Regex::new(
                r"(?is)Nom \(alphabet d'origine\):\s*(.+?)\s*(?:Titre|Désignation|Date de naissance|Lieu de naissance|Pseudonyme|Nationalité|Autre\(s\) nom\(s\)|Précédemment connu\(e\)|$)",
            )
            .unwrap(),
            other_names: Regex::new(
                r"(?i)Autre\(s\) nom\(s\) connu\(s\):\s*(.+?)\s*(?:Précédemment connu\(e\)|Titre|Désignation|Date de naissance|Lieu de naissance|Pseudonyme|Nationalité|$)",
            )
            .unwrap(),
            previously_known: Regex::new(
                r"(?i)Précédemment connu\(e\) sous le nom de:\s*(.+?)\s*(?:Titre|Désignation|Date de naissance|Lieu de naissance|Pseudonyme|Nationalité|$)",
            )
            .unwrap(),
            title: Regex::new(
                r"(?is)Titre:\s*(.+?)\s*(?:Désignation|Date de naissance|Lieu de naissance|Pseudonyme|Nationalité|$)",
            )
            .unwrap(),
            designation: Regex::new(
                r"(?is)Désignation:\s*(.+?)\s*(?:Date de naissance|Lieu de naissance|Pseudonyme|Nationalité|$)",
            )
            .unwrap(),
            date_of_birth: Regex::new(
                r"(?is)Date de naissance:\s*(.+?)\s*(?:Lieu de naissance|Pseudonyme|Nationalité|$)",
            )
            .unwrap(),
            place_of_birth: Regex::new(
                r"(?is)Lieu de naissance:\s*(.+?)\s*(?:Pseudonyme|Nationalité|$)",
            )
            .unwrap(),
            reliable_alias: Regex::new(
                r"(?is)Pseudonyme fiable:\s*(.+?)\s*(?:Pseudonyme peu fiable|Nationalité|$)",
            )
            .unwrap(),
            unreliable_alias: Regex::new(r"(?is)Pseudonyme peu fiable:\s*(.+?)\s*(?:Nationalité|$)")
                .unwrap(),
            letter_marker: Regex::new(r"[a-z]\)").unwrap(),
            nationality: Regex::new(
                r"(?is)Nationalité:\s*(.+?)\s*(?:Numéro de passeport|Numéro national|Adresse|Date d'inscription|$)",
            )
            .unwrap(),
            passport: Regex::new(
                r"(?is)Numéro de passeport:\s*(.+?)\s*(?:Numéro national|Adresse|Date d'inscription|$)",
            )
            .unwrap(),
            passport_alt: Regex::new(
                r"(?is)Numéro de passport:\s*(.+?)\s*(?:Numéro national|Adresse|Date d'inscription|$)",
            )
            .unwrap(),
            national_id: Regex::new(
                r"(?is)Numéro national d'identification:\s*(.+?)\s*(?:Adresse|Date d'inscription|$)",
            )
            .unwrap(),
            national_id_alt: Regex::new(
                r"(?is)Numéro national d'identité:\s*(.+?)\s*(?:Adresse|Date d'inscription|$)",
            )
            .unwrap(),
            entity_name: Regex::new(
                r"(?i)Nom:\s*(.+?)\s*(?:Autre\(s\) nom\(s\)|Nom \(alphabet d'origine\)|Précédemment connu\(e\)|Adresse|Date d'inscription|Nationalité|Renseignements divers|$)",
            )
            .unwrap(),
            entity_nationality: Regex::new(
                r"(?i)Nationalité:\s*(.+?)\s*(?:Autre\(s\) nom\(s\)|Précédemment connu\(e\)|Adresse|Date d'inscription|Renseignements divers|$)",
            )
            .unwrap(),
            list_split: Regex::new(r"[;,]|\d+\)").unwrap(),
        }
    }

    /// Extract the text layer from PDF bytes and parse it
    pub fn parse_pdf(&self, bytes: &[u8]) -> Result<Vec<SanctionsEntry>, PdfListError> {
        let text = pdf_extract::extract_text_from_mem(bytes)?;
        Ok(self.parse_text(&text))
    }

    /// Parse extracted sanctions-list text into entries.
    ///
    /// Entity headers end in 'e', person headers in 'i'. Entities are
    /// processed first; an id is kept only the first time it appears.
    pub fn parse_text(&self, text: &str) -> Vec<SanctionsEntry> {
        let mut entries = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        let entity_headers = self.find_headers(&self.entity_header, text);
        for (i, header) in entity_headers.iter().enumerate() {
            let end = entity_headers
                .get(i + 1)
                .map_or(text.len(), |next| next.start);
            if seen.insert(header.id.clone()) {
                entries.push(self.parse_entity(&header.id, &text[header.start..end]));
            }
        }

        let person_headers = self.find_headers(&self.person_header, text);
        for (i, header) in person_headers.iter().enumerate() {
            let end = person_headers
                .get(i + 1)
                .map_or(text.len(), |next| next.start);
            let entry_text = self.trim_trailing_reference(&text[header.start..end]);
            if seen.insert(header.id.clone()) {
                entries.push(self.parse_person(&header.id, entry_text));
            }
        }

        tracing::info!(count = entries.len(), "parsed sanctions list PDF text");
        entries
    }

    fn find_headers(&self, header: &Regex, text: &str) -> Vec<HeaderMatch> {
        header
            .captures_iter(text)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                Some(HeaderMatch {
                    id: format!("{}.{}", caps.get(1)?.as_str(), caps.get(2)?.as_str()),
                    start: whole.start(),
                })
            })
            .collect()
    }

    /// Some renditions append navigation text ("click here" plus a foreign
    /// reference id) after an entry; cut the slice at the navigation marker
    fn trim_trailing_reference<'a>(&self, entry_text: &'a str) -> &'a str {
        let probe = next_char_boundary(entry_text, 10);
        if let Some(embedded) = self.embedded_id.find(&entry_text[probe..]) {
            let embedded_pos = probe + embedded.start();
            if let Some(click_pos) = entry_text[..embedded_pos].rfind("click here") {
                return &entry_text[..click_pos];
            }
        }
        entry_text
    }

    fn parse_person(&self, id: &str, text: &str) -> SanctionsEntry {
        let mut entry = SanctionsEntry::new(id, "", EntryType::Person);

        if let Some(name) = self.capture(&self.name, text) {
            entry.name = name;
        }
        entry.original_script = self.capture(&self.original_script, text);
        entry.title = self.capture(&self.title, text);
        entry.designation = self.capture(&self.designation, text);
        entry.date_of_birth = self.capture(&self.date_of_birth, text);
        entry.place_of_birth = self.capture(&self.place_of_birth, text);
        entry.nationality = self.capture(&self.nationality, text);
        entry.passport_no = self
            .capture(&self.passport, text)
            .or_else(|| self.capture(&self.passport_alt, text));
        entry.national_id = self
            .capture(&self.national_id, text)
            .or_else(|| self.capture(&self.national_id_alt, text));

        if let Some(raw) = capture_raw(&self.other_names, text) {
            entry.other_names = self.split_name_list(raw);
        }
        if let Some(raw) = capture_raw(&self.previously_known, text) {
            entry.previously_known_as = self.split_name_list(raw);
        }
        if let Some(raw) = capture_raw(&self.reliable_alias, text) {
            entry.reliable_alias = self.split_name_list(raw);
        }
        if let Some(raw) = capture_raw(&self.unreliable_alias, text) {
            entry.unreliable_alias = self
                .split_lettered_aliases(raw)
                .unwrap_or_else(|| self.split_name_list(raw));
        }

        entry
    }

    /// Entity blocks only carry a name and nationality worth extracting
    fn parse_entity(&self, id: &str, text: &str) -> SanctionsEntry {
        let mut entry = SanctionsEntry::new(id, "", EntryType::Entity);
        if let Some(name) = self.capture(&self.entity_name, text) {
            entry.name = name;
        }
        entry.nationality = self.capture(&self.entity_nationality, text);
        entry
    }

    fn capture(&self, pattern: &Regex, text: &str) -> Option<String> {
        let m = pattern.captures(text)?.get(1)?;
        let value = m.as_str().trim();
        (!value.is_empty()).then(|| value.to_string())
    }

    /// Split an enumeration like "Foo; Bar, 2) Baz" into cleaned names
    fn split_name_list(&self, raw: &str) -> Vec<String> {
        self.list_split
            .split(raw)
            .map(|part| {
                part.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ';' | ':'))
            })
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Alias runs marked "a) ... b) ..." take each marker's text up to the
    /// next marker; falls back to None when no markers are present
    fn split_lettered_aliases(&self, raw: &str) -> Option<Vec<String>> {
        let markers: Vec<regex::Match> = self.letter_marker.find_iter(raw).collect();
        if markers.is_empty() {
            return None;
        }

        let mut aliases = Vec::new();
        for (i, marker) in markers.iter().enumerate() {
            let stop = markers.get(i + 1).map_or(raw.len(), |next| next.start());
            let segment = raw[marker.end()..stop].trim_start();
            let content = segment.lines().next().unwrap_or("").trim();
            if !content.is_empty() {
                aliases.push(content.to_string());
            }
        }
        (!aliases.is_empty()).then_some(aliases)
    }
}

impl Default for PdfListParser {
    fn default() -> Self {
        Self::new()
    }
}

fn capture_raw<'a>(pattern: &Regex, text: &'a str) -> Option<&'a str> {
    Some(pattern.captures(text)?.get(1)?.as_str())
}

fn next_char_boundary(s: &str, mut idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    while !s.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}
