/// Canonical text embedded for a catalog row.
///
/// Changing this format invalidates every stored embedding.
pub fn document_text(name: &str, description: Option<&str>) -> String {
    format!(
        "Product Name: {}\nDescription: {}",
        name,
        description.unwrap_or_default()
    )
}
