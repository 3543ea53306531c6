//! Interactor loading from MI-JSON documents
//!
//! Only `interactor` elements of the `data` array become entities; the
//! interaction elements mixed in with them are skipped.

use serde::Deserialize;
use std::path::Path;

use crate::error::Result as CrateResult;
use crate::models::{Entity, MISSING_SEQUENCE};
use crate::utils::error::ParseError;

const UNIPROT_DB: &str = "uniprotkb";

#[derive(Debug, Deserialize)]
struct MiJson {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct InteractorJson {
    identifier: IdentifierJson,
    #[serde(default)]
    label: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<NamedJson>,
    #[serde(default)]
    organism: Option<OrganismJson>,
    #[serde(default)]
    sequence: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdentifierJson {
    id: String,
    #[serde(default)]
    db: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamedJson {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct OrganismJson {
    #[serde(default)]
    scientific: String,
    #[serde(default)]
    common: String,
}

impl InteractorJson {
    fn description(&self) -> String {
        let organism = match &self.organism {
            Some(o) => format!("{}({})", o.scientific, o.common),
            None => String::from("no organism data"),
        };
        let kind = self.kind.as_ref().map(|k| k.name.as_str()).unwrap_or("");
        format!("{kind}, {organism}, {}", self.identifier.id)
    }

    fn is_uniprot(&self) -> bool {
        self.identifier.db.as_deref() == Some(UNIPROT_DB)
    }

    fn into_entity(self) -> Entity {
        let description = self.description();
        let is_uniprot = self.is_uniprot();
        let id = self.identifier.id;
        let name = self.label.unwrap_or_else(|| id.clone());

        let mut entity = Entity::new(id.clone(), name);
        entity.description = Some(description);

        if is_uniprot {
            entity.accession = Some(id);
        }

        // Non-UniProt interactors cannot be backfilled
        entity.sequence = match self.sequence {
            Some(seq) => Some(seq),
            None if is_uniprot => None,
            None => Some(MISSING_SEQUENCE.to_string()),
        };

        entity
    }
}

/// Read the interactors of an MI-JSON document, in document order
pub fn load_entities(json: &str) -> Result<Vec<Entity>, ParseError> {
    let doc: MiJson =
        serde_json::from_str(json).map_err(|e| ParseError::MalformedInput(e.to_string()))?;

    doc.data
        .into_iter()
        .filter(|element| element.get("object").and_then(|o| o.as_str()) == Some("interactor"))
        .map(|element| {
            serde_json::from_value::<InteractorJson>(element)
                .map(InteractorJson::into_entity)
                .map_err(|e| ParseError::MalformedInput(e.to_string()))
        })
        .collect()
}

/// Read an MI-JSON file and load its interactors
pub async fn read_entities(path: &Path) -> CrateResult<Vec<Entity>> {
    let json = tokio::fs::read_to_string(path).await?;
    Ok(load_entities(&json)?)
}
