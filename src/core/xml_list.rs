use serde::Deserialize;
use thiserror::Error;

use crate::models::{EntryType, SanctionsEntry};

#[derive(Debug, Error)]
pub enum XmlListError {
    #[error("Failed to parse XML: {0}")]
    Parse(#[from] quick_xml::DeError),
}

/// UN consolidated list document, reduced to the elements the mapping reads.
/// Unknown elements are ignored, the real feed carries many more.
#[derive(Debug, Deserialize)]
#[serde(rename = "CONSOLIDATED_LIST")]
struct ConsolidatedList {
    #[serde(rename = "INDIVIDUALS", default)]
    individuals: IndividualsBlock,

    #[serde(rename = "ENTITIES", default)]
    entities: EntitiesBlock,
}

#[derive(Debug, Default, Deserialize)]
struct IndividualsBlock {
    #[serde(rename = "INDIVIDUAL", default)]
    individuals: Vec<Individual>,
}

#[derive(Debug, Default, Deserialize)]
struct EntitiesBlock {
    #[serde(rename = "ENTITY", default)]
    entities: Vec<Entity>,
}

#[derive(Debug, Default, Deserialize)]
struct Individual {
    #[serde(rename = "DATAID")]
    dataid: Option<String>,

    #[serde(rename = "REFERENCE_NUMBER")]
    reference_number: Option<String>,

    #[serde(rename = "FIRST_NAME")]
    first_name: Option<String>,

    #[serde(rename = "SECOND_NAME")]
    second_name: Option<String>,

    #[serde(rename = "THIRD_NAME")]
    third_name: Option<String>,

    #[serde(rename = "FOURTH_NAME")]
    fourth_name: Option<String>,

    #[serde(rename = "NAME_ORIGINAL_SCRIPT")]
    name_original_script: Option<String>,

    #[serde(rename = "GENDER")]
    gender: Option<String>,

    #[serde(rename = "COMMENTS1")]
    comments: Option<String>,

    #[serde(rename = "LISTED_ON")]
    listed_on: Option<String>,

    #[serde(rename = "TITLE", default)]
    title: ValueList,

    #[serde(rename = "DESIGNATION", default)]
    designation: ValueList,

    #[serde(rename = "NATIONALITY", default)]
    nationality: ValueList,

    #[serde(rename = "LAST_DAY_UPDATED", default)]
    last_day_updated: ValueList,

    #[serde(rename = "INDIVIDUAL_DATE_OF_BIRTH", default)]
    dates_of_birth: Vec<DateOfBirth>,

    #[serde(rename = "INDIVIDUAL_PLACE_OF_BIRTH", default)]
    places_of_birth: Vec<PlaceOfBirth>,

    #[serde(rename = "INDIVIDUAL_DOCUMENT", default)]
    documents: Vec<DocumentRecord>,

    #[serde(rename = "INDIVIDUAL_ALIAS", default)]
    aliases: Vec<AliasRecord>,

    #[serde(rename = "INDIVIDUAL_ADDRESS", default)]
    addresses: Vec<AddressRecord>,
}

#[derive(Debug, Default, Deserialize)]
struct Entity {
    #[serde(rename = "DATAID")]
    dataid: Option<String>,

    #[serde(rename = "REFERENCE_NUMBER")]
    reference_number: Option<String>,

    #[serde(rename = "FIRST_NAME")]
    first_name: Option<String>,

    #[serde(rename = "NAME_ORIGINAL_SCRIPT")]
    name_original_script: Option<String>,

    #[serde(rename = "COMMENTS1")]
    comments: Option<String>,

    #[serde(rename = "LISTED_ON")]
    listed_on: Option<String>,

    #[serde(rename = "LAST_DAY_UPDATED", default)]
    last_day_updated: ValueList,

    #[serde(rename = "ENTITY_ALIAS", default)]
    aliases: Vec<AliasRecord>,

    #[serde(rename = "ENTITY_ADDRESS", default)]
    addresses: Vec<AddressRecord>,
}

/// Wrapper for repeated VALUE elements
#[derive(Debug, Default, Deserialize)]
struct ValueList {
    #[serde(rename = "VALUE", default)]
    values: Vec<String>,
}

impl ValueList {
    fn joined(&self) -> Option<String> {
        let joined = self.values.join(", ");
        (!joined.is_empty()).then_some(joined)
    }

    fn last_value(&self) -> Option<String> {
        self.values
            .last()
            .filter(|v| !v.is_empty())
            .cloned()
    }
}

#[derive(Debug, Default, Deserialize)]
struct DateOfBirth {
    #[serde(rename = "TYPE_OF_DATE")]
    type_of_date: Option<String>,

    #[serde(rename = "DATE")]
    date: Option<String>,

    #[serde(rename = "YEAR")]
    year: Option<String>,

    #[serde(rename = "MONTH")]
    month: Option<String>,

    #[serde(rename = "DAY")]
    day: Option<String>,

    #[serde(rename = "FROM_YEAR")]
    from_year: Option<String>,

    #[serde(rename = "TO_YEAR")]
    to_year: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PlaceOfBirth {
    #[serde(rename = "CITY")]
    city: Option<String>,

    #[serde(rename = "CITY_OF_BIRTH")]
    city_of_birth: Option<String>,

    #[serde(rename = "STATE_PROVINCE")]
    state_province: Option<String>,

    #[serde(rename = "COUNTRY")]
    country: Option<String>,

    #[serde(rename = "COUNTRY_OF_BIRTH")]
    country_of_birth: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DocumentRecord {
    #[serde(rename = "TYPE_OF_DOCUMENT")]
    type_of_document: Option<String>,

    #[serde(rename = "TYPE_OF_DOCUMENT2")]
    type_of_document2: Option<String>,

    #[serde(rename = "NUMBER")]
    number: Option<String>,

    #[serde(rename = "COUNTRY_OF_ISSUE")]
    country_of_issue: Option<String>,

    #[serde(rename = "ISSUING_COUNTRY")]
    issuing_country: Option<String>,

    #[serde(rename = "DATE_OF_ISSUE")]
    date_of_issue: Option<String>,

    #[serde(rename = "CITY_OF_ISSUE")]
    city_of_issue: Option<String>,

    #[serde(rename = "NOTE")]
    note: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AliasRecord {
    #[serde(rename = "QUALITY")]
    quality: Option<String>,

    #[serde(rename = "ALIAS_NAME")]
    alias_name: Option<String>,

    #[serde(rename = "DATE_OF_BIRTH")]
    date_of_birth: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct AddressRecord {
    #[serde(rename = "STREET")]
    street: Option<String>,

    #[serde(rename = "CITY")]
    city: Option<String>,

    #[serde(rename = "STATE_PROVINCE")]
    state_province: Option<String>,

    #[serde(rename = "COUNTRY")]
    country: Option<String>,

    #[serde(rename = "NOTE")]
    note: Option<String>,

    #[serde(rename = "ZIP_CODE")]
    zip_code: Option<String>,
}

/// Parse a UN consolidated sanctions list document into sanctions entries.
///
/// Individuals come first, then entities, matching the document order.
/// A well-formed document without either block yields an empty list.
pub fn parse_consolidated_list(xml: &str) -> Result<Vec<SanctionsEntry>, XmlListError> {
    let list: ConsolidatedList = quick_xml::de::from_str(xml)?;

    let mut entries = Vec::new();
    for individual in &list.individuals.individuals {
        entries.push(map_individual(individual));
    }
    for entity in &list.entities.entities {
        entries.push(map_entity(entity));
    }

    tracing::info!(count = entries.len(), "parsed consolidated sanctions list");
    Ok(entries)
}

fn map_individual(individual: &Individual) -> SanctionsEntry {
    let id = entry_id(&individual.reference_number, &individual.dataid);
    let name_parts: Vec<&str> = [
        &individual.first_name,
        &individual.second_name,
        &individual.third_name,
        &individual.fourth_name,
    ]
    .iter()
    .filter_map(|part| non_empty(part))
    .collect();

    let mut entry = SanctionsEntry::new(&id, &name_parts.join(" "), EntryType::Person);
    entry.title = individual.title.joined();
    entry.designation = individual.designation.joined();
    entry.nationality = individual.nationality.joined();
    entry.listed_on = owned(&individual.listed_on);
    entry.other_info = owned(&individual.comments);
    entry.original_script = owned(&individual.name_original_script);
    entry.gender = owned(&individual.gender);
    entry.last_updated = individual.last_day_updated.last_value();
    entry.date_of_birth = individual.dates_of_birth.first().and_then(format_date_of_birth);
    entry.place_of_birth = individual
        .places_of_birth
        .first()
        .and_then(format_place_of_birth);

    for alias in &individual.aliases {
        let Some(name) = non_empty(&alias.alias_name) else {
            continue;
        };
        let mut info = name.to_string();
        if let Some(dob) = non_empty(&alias.date_of_birth) {
            info.push_str(&format!(" (né le: {})", dob));
        }
        // Only an explicit Low quality marks the alias unreliable
        if alias.quality.as_deref() == Some("Low") {
            entry.unreliable_alias.push(info);
        } else {
            entry.reliable_alias.push(info);
        }
    }

    for address in &individual.addresses {
        if let Some(formatted) = format_address(address, true) {
            entry.address.push(formatted);
        }
    }

    classify_documents(&individual.documents, &mut entry);
    entry
}

fn map_entity(entity: &Entity) -> SanctionsEntry {
    let id = entry_id(&entity.reference_number, &entity.dataid);
    let name = non_empty(&entity.first_name).unwrap_or_default();

    let mut entry = SanctionsEntry::new(&id, name, EntryType::Entity);
    entry.listed_on = owned(&entity.listed_on);
    entry.other_info = owned(&entity.comments);
    entry.original_script = owned(&entity.name_original_script);
    entry.last_updated = entity.last_day_updated.last_value();

    for alias in &entity.aliases {
        let Some(name) = non_empty(&alias.alias_name) else {
            continue;
        };
        match alias.quality.as_deref() {
            Some("a.k.a.") => entry.other_names.push(name.to_string()),
            Some("f.k.a.") => entry.previously_known_as.push(name.to_string()),
            _ => {}
        }
    }

    for address in &entity.addresses {
        if let Some(formatted) = format_address(address, false) {
            entry.address.push(formatted);
        }
    }

    entry
}

/// Reference numbers identify entries; synthesize an id from the data id
/// when the feed omits one
fn entry_id(reference: &Option<String>, dataid: &Option<String>) -> String {
    match non_empty(reference) {
        Some(reference) => reference.to_string(),
        None => format!("XML-{}", non_empty(dataid).unwrap_or_default()),
    }
}

fn format_date_of_birth(dob: &DateOfBirth) -> Option<String> {
    let mut out = String::new();

    if let Some(date) = non_empty(&dob.date) {
        out.push_str(date);
    } else {
        if let Some(type_of_date) = non_empty(&dob.type_of_date) {
            out.push_str(type_of_date);
            out.push(' ');
        }
        if let Some(year) = non_empty(&dob.year) {
            out.push_str(year);
            if let Some(month) = non_empty(&dob.month) {
                out.push('-');
                out.push_str(month);
                if let Some(day) = non_empty(&dob.day) {
                    out.push('-');
                    out.push_str(day);
                }
            }
        }
        if let Some(from_year) = non_empty(&dob.from_year) {
            if !out.is_empty() {
                out.push_str(", ");
            }
            out.push_str("De ");
            out.push_str(from_year);
            if let Some(to_year) = non_empty(&dob.to_year) {
                out.push_str(" à ");
                out.push_str(to_year);
            }
        }
    }

    let trimmed = out.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn format_place_of_birth(pob: &PlaceOfBirth) -> Option<String> {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(city) = non_empty(&pob.city).or_else(|| non_empty(&pob.city_of_birth)) {
        parts.push(city);
    }
    if let Some(state) = non_empty(&pob.state_province) {
        parts.push(state);
    }
    if let Some(country) = non_empty(&pob.country).or_else(|| non_empty(&pob.country_of_birth)) {
        parts.push(country);
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

fn format_address(address: &AddressRecord, include_zip: bool) -> Option<String> {
    let mut parts: Vec<String> = Vec::new();
    for field in [
        &address.street,
        &address.city,
        &address.state_province,
        &address.country,
        &address.note,
    ] {
        if let Some(value) = non_empty(field) {
            parts.push(value.to_string());
        }
    }
    if include_zip {
        if let Some(zip) = non_empty(&address.zip_code) {
            parts.push(format!("Code postal: {}", zip));
        }
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Sort identification documents into passport, national id and other
/// buckets based on their declared types
fn classify_documents(documents: &[DocumentRecord], entry: &mut SanctionsEntry) {
    const NATIONAL_ID_MARKERS: [&str; 5] =
        ["national", "identity", "id", "identification", "carte"];

    let mut passports: Vec<String> = Vec::new();
    let mut national_ids: Vec<String> = Vec::new();
    let mut other_docs: Vec<String> = Vec::new();

    for document in documents {
        let doc_type = non_empty(&document.type_of_document).unwrap_or_default();
        let doc_type2 = non_empty(&document.type_of_document2).unwrap_or_default();
        let number = non_empty(&document.number).unwrap_or_default();
        if doc_type.is_empty() && doc_type2.is_empty() && number.is_empty() {
            continue;
        }

        let mut info = number.to_string();
        let mut type_info = doc_type.to_string();
        if !doc_type2.is_empty() {
            if type_info.is_empty() {
                type_info.push_str(doc_type2);
            } else {
                type_info.push_str(", ");
                type_info.push_str(doc_type2);
            }
        }
        if !type_info.is_empty() {
            if info.is_empty() {
                info = format!("({})", type_info);
            } else {
                info = format!("{} ({})", info, type_info);
            }
        }

        let mut details: Vec<String> = Vec::new();
        if let Some(country) =
            non_empty(&document.country_of_issue).or_else(|| non_empty(&document.issuing_country))
        {
            details.push(format!("Pays d'émission: {}", country));
        }
        if let Some(date) = non_empty(&document.date_of_issue) {
            details.push(format!("Date d'émission: {}", date));
        }
        if let Some(city) = non_empty(&document.city_of_issue) {
            details.push(format!("Ville d'émission: {}", city));
        }
        if let Some(note) = non_empty(&document.note) {
            details.push(format!("Note: {}", note));
        }
        if !details.is_empty() {
            info = format!("{} - {}", info, details.join(", "));
        }

        let kind = format!("{} {}", doc_type, doc_type2).to_lowercase();
        if kind.contains("passport") || kind.contains("passeport") {
            passports.push(info);
        } else if NATIONAL_ID_MARKERS.iter().any(|marker| kind.contains(marker)) {
            national_ids.push(info);
        } else if !info.is_empty() {
            other_docs.push(info);
        }
    }

    if !passports.is_empty() {
        entry.passport_no = Some(passports.join("\n"));
    }
    if !national_ids.is_empty() {
        entry.national_id = Some(national_ids.join("\n"));
    }
    if !other_docs.is_empty() {
        let lines: Vec<String> = other_docs
            .iter()
            .map(|doc| format!("Document: {}", doc))
            .collect();
        let joined = lines.join("\n");
        entry.other_info = Some(match entry.other_info.take() {
            Some(existing) if !existing.is_empty() => format!("{}\n{}", existing, joined),
            _ => joined,
        });
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn owned(value: &Option<String>) -> Option<String> {
    non_empty(value).map(str::to_string)
}
