// Core algorithm exports
pub mod assessment;
pub mod extractor;
pub mod matcher;
pub mod pdf_list;
pub mod similarity;
pub mod workbook;
pub mod xml_list;

pub use assessment::{extract_risk_assessments, AssessmentExtraction};
pub use extractor::{extract_screening_data, ScreeningExtraction, FALLBACK_NAMES};
pub use matcher::screen_names;
pub use pdf_list::{PdfListError, PdfListParser};
pub use similarity::{match_tier, similarity, HIGH_THRESHOLD, INCLUSION_THRESHOLD, MEDIUM_THRESHOLD};
pub use workbook::{decode_workbook, Cell, ExtractError, Sheet, Workbook};
pub use xml_list::{parse_consolidated_list, XmlListError};
