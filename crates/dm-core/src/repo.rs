//! Typed access to characters and houses in a [`RecordStore`].

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::character::Character;
use crate::error::{CoreError, CoreResult};
use crate::house::PlayerHouse;
use crate::store::RecordStore;

/// Collection holding character documents.
pub const CHARACTERS: &str = "characters";
/// Collection holding house documents.
pub const HOUSES: &str = "houses";

fn to_document<T: Serialize>(record: &T) -> CoreResult<Value> {
    let mut doc = serde_json::to_value(record)?;
    if let Some(object) = doc.as_object_mut() {
        object.remove("id");
    }
    Ok(doc)
}

fn from_document<T: DeserializeOwned>(doc: Value) -> CoreResult<T> {
    Ok(serde_json::from_value(doc)?)
}

/// Persist a new character and return it with its assigned id.
pub fn create_character(store: &mut dyn RecordStore, character: &Character) -> CoreResult<Character> {
    let id = store.insert(CHARACTERS, to_document(character)?)?;
    debug!(%id, name = %character.name, "character created");
    Ok(Character {
        id,
        ..character.clone()
    })
}

/// Load a character by id.
pub fn fetch_character(store: &dyn RecordStore, id: &str) -> CoreResult<Character> {
    let doc = store
        .get(CHARACTERS, id)?
        .ok_or_else(|| CoreError::RecordNotFound {
            collection: CHARACTERS.to_string(),
            id: id.to_string(),
        })?;
    from_document(doc)
}

/// Every character belonging to a house.
pub fn characters_by_house(store: &dyn RecordStore, house_id: &str) -> CoreResult<Vec<Character>> {
    store
        .find_by_field(CHARACTERS, "houseId", &Value::String(house_id.to_string()))?
        .into_iter()
        .map(from_document)
        .collect()
}

/// Overwrite one field of a stored character.
pub fn update_character_field(
    store: &mut dyn RecordStore,
    id: &str,
    field: &str,
    value: Value,
) -> CoreResult<()> {
    store.update_field(CHARACTERS, id, field, value)
}

/// Merge several fields into a stored character in one write.
pub fn batch_update_character(
    store: &mut dyn RecordStore,
    id: &str,
    fields: Map<String, Value>,
) -> CoreResult<()> {
    store.patch(CHARACTERS, id, fields)
}

/// The persisted values of the named fields of a character.
///
/// Fields that serialize to nothing (an unset `chosenClassSkills`) are
/// written as `null`.
pub fn character_patch(character: &Character, fields: &[&str]) -> CoreResult<Map<String, Value>> {
    let doc = serde_json::to_value(character)?;
    let object = doc
        .as_object()
        .ok_or_else(|| CoreError::InvalidRecord("character is not an object".to_string()))?;
    Ok(fields
        .iter()
        .map(|field| {
            let value = object.get(*field).cloned().unwrap_or(Value::Null);
            (field.to_string(), value)
        })
        .collect())
}

/// Write back the named fields of an edited character. A single field is a
/// field update; more than one is a batch patch.
pub fn persist_edit(store: &mut dyn RecordStore, character: &Character, fields: &[&str]) -> CoreResult<()> {
    let mut patch = character_patch(character, fields)?;
    debug!(id = %character.id, ?fields, "persisting character edit");
    match fields {
        [] => Ok(()),
        [field] => {
            let value = patch.remove(*field).unwrap_or(Value::Null);
            update_character_field(store, &character.id, field, value)
        }
        _ => batch_update_character(store, &character.id, patch),
    }
}

/// The house owned by a player, if any.
pub fn house_by_player(store: &dyn RecordStore, player_id: &str) -> CoreResult<Option<PlayerHouse>> {
    store
        .find_by_field(HOUSES, "playerId", &Value::String(player_id.to_string()))?
        .into_iter()
        .next()
        .map(from_document)
        .transpose()
}

/// Persist a new house and return it with its assigned id.
pub fn create_house(store: &mut dyn RecordStore, house: &PlayerHouse) -> CoreResult<PlayerHouse> {
    let id = store.insert(HOUSES, to_document(house)?)?;
    debug!(%id, name = %house.name, "house created");
    Ok(PlayerHouse {
        id,
        ..house.clone()
    })
}

/// Load a house by id.
pub fn fetch_house(store: &dyn RecordStore, id: &str) -> CoreResult<PlayerHouse> {
    let doc = store.get(HOUSES, id)?.ok_or_else(|| CoreError::RecordNotFound {
        collection: HOUSES.to_string(),
        id: id.to_string(),
    })?;
    from_document(doc)
}

/// Merge edited fields (`name`, `motto`, `bio`, `gold`) into a stored house.
pub fn update_house(store: &mut dyn RecordStore, id: &str, fields: Map<String, Value>) -> CoreResult<()> {
    debug!(%id, fields = ?fields.keys().collect::<Vec<_>>(), "updating house");
    store.patch(HOUSES, id, fields)
}
