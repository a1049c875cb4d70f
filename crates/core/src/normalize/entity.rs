//! Typed readers for the records the backend returns
//!
//! Every reader validates the candidate: an object that does not carry the
//! fields a record needs is rejected, never coerced into a half-filled value.

use actasti_domain::{AssignedUser, InventoryItem, Store, StoreRef, User, UserId};
use serde_json::Value;

use super::fields::{first_i64, first_label, first_text};

/// A record type the normalizer can extract
pub trait Entity: Sized {
    /// Human-readable name used in diagnostics.
    const NAME: &'static str;

    /// Read one candidate object, or reject it.
    fn from_candidate(value: &Value) -> Option<Self>;

    /// Whether this record is the one sought by `hint`.
    fn matches_hint(&self, hint: &str) -> bool;
}

/// Read a candidate, unwrapping a Sequelize-style `dataValues` layer.
pub(crate) fn read_entity<T: Entity>(value: &Value) -> Option<T> {
    T::from_candidate(value).or_else(|| value.get("dataValues").and_then(T::from_candidate))
}

impl Entity for User {
    const NAME: &'static str = "user";

    fn from_candidate(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let id = ["id", "userId", "idUsuario"]
            .iter()
            .find_map(|key| value.get(*key).and_then(UserId::from_json))?;
        let name = first_text(value, &["name", "nombre", "fullName", "nombreCompleto"])?;
        let username = first_text(value, &["username", "usuario", "userName", "user_name"])?;

        Some(Self {
            id,
            name,
            username,
            cargo: first_text(value, &["cargo", "position", "puesto"]),
            correo: first_text(value, &["correo", "email", "mail"]),
            role: first_text(value, &["role", "rol"]),
        })
    }

    fn matches_hint(&self, hint: &str) -> bool {
        self.has_username(hint)
    }
}

impl Entity for InventoryItem {
    const NAME: &'static str = "inventory item";

    fn from_candidate(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let item = Self {
            id: first_i64(value, &["id", "idElemento", "elementoId"]),
            serial: first_text(value, &["serial", "numeroSerie", "serie"]),
            placa: first_text(value, &["placa"]),
            placa_ax: first_text(value, &["placaAx", "placa_ax", "placaAX"]),
            tipo: first_label(value, &["tipo", "tipoElemento", "type"]),
            marca: first_label(value, &["marca", "fabricante", "brand"]),
            modelo: first_label(value, &["modelo", "model"]),
            estado: first_label(value, &["estado", "status"]),
            tienda: store_ref(value),
            usuario: assigned_user(value),
            raw_key: None,
        };

        let recognizable = item.serial.is_some()
            || item.placa.is_some()
            || item.placa_ax.is_some()
            || item.modelo.is_some()
            || item.tipo.is_some()
            || item.marca.is_some();
        if !recognizable {
            return None;
        }
        let raw_key = (item.serial.is_none() && item.placa.is_none())
            .then(|| serde_json::to_string(value).ok())
            .flatten();
        Some(Self { raw_key, ..item })
    }

    fn matches_hint(&self, hint: &str) -> bool {
        self.matches_identifier(hint)
    }
}

fn store_ref(value: &Value) -> Option<StoreRef> {
    let nested = ["tienda", "store"].iter().find_map(|key| value.get(*key).filter(|v| v.is_object()));
    let store = match nested {
        Some(store) => StoreRef {
            id: first_i64(store, &["id", "idTienda"]),
            name: first_text(store, &["nombre", "name"]),
        },
        None => StoreRef {
            id: first_i64(value, &["tiendaId", "tienda_id", "idTienda"]),
            name: first_text(value, &["tiendaNombre", "nombreTienda", "tienda"]),
        },
    };
    (store.id.is_some() || store.name.is_some()).then_some(store)
}

fn assigned_user(value: &Value) -> Option<AssignedUser> {
    for key in ["usuario", "user", "asignadoA", "assignedUser"] {
        match value.get(key) {
            Some(user @ Value::Object(_)) => {
                let assigned = AssignedUser {
                    id: user.get("id").and_then(UserId::from_json),
                    name: first_text(user, &["name", "nombre"]),
                    username: first_text(user, &["username", "usuario"]),
                    role: first_text(user, &["role", "rol"]),
                };
                if assigned != AssignedUser::default() {
                    return Some(assigned);
                }
            }
            Some(Value::String(name)) if !name.trim().is_empty() => {
                return Some(AssignedUser {
                    name: Some(name.trim().to_string()),
                    ..Default::default()
                });
            }
            _ => {}
        }
    }
    None
}

impl Entity for Store {
    const NAME: &'static str = "store";

    fn from_candidate(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        Some(Self {
            id: first_i64(value, &["id", "idTienda", "tiendaId"])?,
            name: first_text(value, &["nombre", "name", "tienda"])?,
        })
    }

    fn matches_hint(&self, hint: &str) -> bool {
        let hint = hint.trim();
        self.name.trim().eq_ignore_ascii_case(hint) || self.id.to_string() == hint
    }
}
