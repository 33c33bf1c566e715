use fieldsearch::{DocId, Document};
use serde::{Deserialize, Serialize};

/// One sample record: an identifier, a short name, and a free-text
/// description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: DocId,
    pub name: String,
    pub description: String,
}

impl Record {
    fn new(id: DocId, name: &str, description: &str) -> Self {
        Record {
            id,
            name: name.to_string(),
            description: description.to_string(),
        }
    }

    pub fn into_document(self) -> Document {
        Document::new(self.id)
            .field("name", self.name)
            .field("description", self.description)
    }
}

/// The record source feeding the index: a fixed in-memory table of cities.
#[derive(Debug, Default)]
pub struct SampleDataRepository;

impl SampleDataRepository {
    pub fn get_all(&self) -> Vec<Record> {
        vec![
            Record::new(1, "Belgrad", "City in Serbia"),
            Record::new(2, "Moscow", "City in Russia"),
            Record::new(3, "Chicago", "City in USA"),
            Record::new(4, "Mumbai", "City in India"),
            Record::new(5, "Hong-Kong", "City in Hong-Kong"),
        ]
    }

    pub fn get(&self, id: DocId) -> Option<Record> {
        self.get_all().into_iter().find(|r| r.id == id)
    }
}
