use crate::error::Error;
use serde::Deserialize;

/// The furniture types exactly as the furniture service lists them: a JSON array of strings whose
/// order and duplicates are preserved.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(transparent)]
pub struct FurnitureTypes(Vec<String>);

impl FurnitureTypes {
    pub fn decode(body: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_keeps_order_and_duplicates() {
        let types = FurnitureTypes::decode(r#"["Tables","Chairs","Tables"]"#).unwrap();

        assert_eq!(types.as_slice(), ["Tables", "Chairs", "Tables"]);
    }

    #[test]
    fn test_decode_rejects_other_shapes() {
        assert!(matches!(
            FurnitureTypes::decode(r#"{"types":["Tables"]}"#),
            Err(Error::DeserializationError(_))
        ));
        assert!(FurnitureTypes::decode("[1, 2]").is_err());
    }
}
