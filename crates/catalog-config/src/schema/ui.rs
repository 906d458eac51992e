use serde::{Deserialize, Serialize};

/// Strings shown by the terminal front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub title: String,
    pub subtitle: String,
    pub password_prompt: String,
    pub placeholder: String,
    pub busy_message: String,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            title: "Agente Experto Redfil".into(),
            subtitle: "Pregúntame sobre filtros, modelos de vehículos o medidas del catálogo."
                .into(),
            password_prompt: "Ingrese la clave de acceso".into(),
            placeholder: "Ej: ¿Qué filtro de aire usa el Chevrolet Corsa?".into(),
            busy_message: "Buscando en el catálogo...".into(),
        }
    }
}
