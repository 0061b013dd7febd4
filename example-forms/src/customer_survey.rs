use flow_form_types::{FormDefinition, FormError};

/// A customer survey kept as JSON, with German UI strings.
pub const CUSTOMER_SURVEY_JSON: &str = include_str!("../forms/customer_survey.json");

pub fn customer_survey() -> Result<FormDefinition, FormError> {
    FormDefinition::from_json(CUSTOMER_SURVEY_JSON)
}
