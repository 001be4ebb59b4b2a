// Service exports
pub mod indexer;
pub mod uploads;

pub use indexer::{
    CatalogStatistics, DeleteReceipt, DocumentListing, IndexerClient, IndexerError, UploadReceipt,
};
pub use uploads::{
    UploadArchive, ValidationError, ALLOWED_EXTENSIONS, ALLOWED_MIME_TYPES, DOCUMENT_CATEGORIES,
};
