//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# Catalog Assistant Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.
# Secrets (PASSWORD, GOOGLE_API_KEY) live in secrets.toml next to this file.

[model]
# name = "gemini-1.5-flash"
# api_base = "https://generativelanguage.googleapis.com"
# connect_timeout_secs = 10     # 1-300
# request_timeout_secs = 120    # 1-3600
# stream = true

[generation]
# temperature = 0.2             # 0.0-2.0, low keeps answers close to the catalog
# top_p = 0.95                  # 0.0-1.0
# top_k = 64                    # 1-1000
# max_output_tokens = 8192      # 1-65536
# system_instruction = "Eres un experto en autopartes. ..."

[document]
# path = "CATALOGO REDFIL ACTUALIZADO-2.pdf"
# mime_type = "application/pdf"
# display_name = "Catalogo Redfil"
# poll_interval_ms = 1000       # 10-60000
# max_polls = 30                # 1-600

[ui]
# title = "Agente Experto Redfil"
# password_prompt = "Ingrese la clave de acceso"
# busy_message = "Buscando en el catálogo..."

[logging]
# level = "INFO"                # DEBUG, INFO, WARNING, ERROR
"##
    .to_string()
}
