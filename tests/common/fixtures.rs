//! Shared catalog rows and request bodies.

use sheetmatch::CatalogProduct;

pub const TEST_BOUNDARY: &str = "sheetmatch-integration-boundary";

pub fn product(id: i64, name: &str, description: Option<&str>) -> CatalogProduct {
    CatalogProduct {
        id,
        product_code: Some(format!("D-{id:04}")),
        name: name.to_string(),
        price: 1980.0,
        description: description.map(str::to_string),
        image_url: Some(format!("/images/{id}.png")),
    }
}

/// Returns `(content_type, body)` for a single-file multipart upload.
pub fn multipart_body(field: &str, mime: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{TEST_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"order.jpg\"\r\nContent-Type: {mime}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{TEST_BOUNDARY}--\r\n").as_bytes());
    (
        format!("multipart/form-data; boundary={TEST_BOUNDARY}"),
        body,
    )
}

/// A one-hot vector of length `dim`.
pub fn unit(dim: usize, hot: usize) -> Vec<f32> {
    let mut v = vec![0.0; dim];
    v[hot] = 1.0;
    v
}
