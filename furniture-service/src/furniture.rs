/// Source of the furniture catalogue.
#[derive(Debug, Clone, Default)]
pub struct FurnitureService {}

impl FurnitureService {
    pub fn new() -> Self {
        Self {}
    }

    /// The furniture types in catalogue order.
    pub fn furniture_types(&self) -> Vec<String> {
        vec![String::from("Tables"), String::from("Chairs")]
    }
}
