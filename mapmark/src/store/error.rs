#[derive(thiserror::Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("Marker title cannot be empty")]
    EmptyTitle,
    #[error("Invalid marker position `{lat}, {lng}`")]
    InvalidPosition { lat: f64, lng: f64 },
}
