//! JSON Schema validation for custom command exports

use anyhow::{Result, anyhow};
use jsonschema::Validator;
use serde_json::Value;

/// Compile the embedded JSON schema describing one command export
pub fn get_schema() -> Result<Validator> {
    let schema_str = include_str!("../../docs/custom_commands.schema.json");
    let schema: Value = serde_json::from_str(schema_str)
        .map_err(|e| anyhow!("Failed to parse embedded JSON schema: {e}"))?;

    jsonschema::draft7::new(&schema).map_err(|e| anyhow!("Failed to compile JSON schema: {e}"))
}

/// Validate one export against the compiled schema
pub fn validate_against_schema(schema: &Validator, export: &Value) -> Result<()> {
    let error_messages: Vec<String> = schema
        .iter_errors(export)
        .map(|e| format!("  - {e}"))
        .collect();

    if !error_messages.is_empty() {
        return Err(anyhow!(
            "Command definition is invalid:\n{}",
            error_messages.join("\n")
        ));
    }

    Ok(())
}
