use actix_multipart::Multipart;
use futures_util::StreamExt as _;

/// One file pulled out of a multipart form
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Fields of a document upload form
pub struct DocumentForm {
    pub file: Option<UploadedFile>,
    pub title: String,
    pub category: String,
    pub description: String,
}

/// Read the form until the named file field is found
///
/// Other fields are drained and ignored. Returns `None` when the form
/// carries no field of that name.
pub async fn collect_file(
    payload: &mut Multipart,
    field_name: &str,
) -> Result<Option<UploadedFile>, actix_web::Error> {
    while let Some(item) = payload.next().await {
        let mut field = item?;
        if field.name() != field_name {
            while let Some(chunk) = field.next().await {
                chunk?;
            }
            continue;
        }
        return Ok(Some(read_file_field(&mut field).await?));
    }
    Ok(None)
}

/// Read a complete document upload form
pub async fn collect_document_form(
    payload: &mut Multipart,
) -> Result<DocumentForm, actix_web::Error> {
    let mut form = DocumentForm {
        file: None,
        title: String::new(),
        category: String::new(),
        description: String::new(),
    };

    while let Some(item) = payload.next().await {
        let mut field = item?;
        match field.name() {
            "file" => form.file = Some(read_file_field(&mut field).await?),
            "title" => form.title = read_text_field(&mut field).await?,
            "category" => form.category = read_text_field(&mut field).await?,
            "description" => form.description = read_text_field(&mut field).await?,
            _ => {
                while let Some(chunk) = field.next().await {
                    chunk?;
                }
            }
        }
    }

    Ok(form)
}

async fn read_file_field(
    field: &mut actix_multipart::Field,
) -> Result<UploadedFile, actix_web::Error> {
    let filename = field
        .content_disposition()
        .get_filename()
        .unwrap_or_default()
        .to_string();
    let content_type = field.content_type().map(|mime| mime.to_string());

    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        bytes.extend_from_slice(&chunk?);
    }

    Ok(UploadedFile {
        filename,
        content_type,
        bytes,
    })
}

async fn read_text_field(
    field: &mut actix_multipart::Field,
) -> Result<String, actix_web::Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        bytes.extend_from_slice(&chunk?);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
