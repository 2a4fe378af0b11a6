//! Validated, compiled form of an invoice template.

use std::collections::HashSet;

use regex::Regex;

use crate::error::TemplateError;
use crate::models::record::{Backend, InvoiceRecord};
use crate::models::template::{
    BillingCategory, CategoryKeywords, FieldSpec, InvoiceTemplate, METADATA_COLUMNS,
};

/// An invoice template with its text patterns compiled.
///
/// Shared read-only by every stage of the pipeline.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    template: InvoiceTemplate,
    field_patterns: Vec<Option<Regex>>,
    date_pattern: Regex,
    invoice_number_pattern: Regex,
}

impl CompiledTemplate {
    /// Validate and compile a template.
    pub fn compile(template: InvoiceTemplate) -> Result<Self, TemplateError> {
        let declared: HashSet<BillingCategory> =
            template.categories.iter().map(|c| c.category).collect();

        for set in &template.categories {
            if set.keywords.is_empty() {
                return Err(TemplateError::EmptyKeywords(set.category));
            }
        }

        let mut seen = HashSet::new();
        let mut field_patterns = Vec::with_capacity(template.fields.len());
        for field in &template.fields {
            if METADATA_COLUMNS.contains(&field.name.as_str()) {
                return Err(TemplateError::ReservedName(field.name.clone()));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(TemplateError::DuplicateField(field.name.clone()));
            }
            if !declared.contains(&field.category) {
                return Err(TemplateError::UndeclaredCategory {
                    field: field.name.clone(),
                    category: field.category,
                });
            }
            let pattern = field
                .pattern
                .as_deref()
                .map(|p| compile_pattern(&field.name, p))
                .transpose()?;
            field_patterns.push(pattern);
        }

        let date_pattern = compile_pattern("date", &template.metadata.date_pattern)?;
        let invoice_number_pattern =
            compile_pattern("invoice_number", &template.metadata.invoice_number_pattern)?;

        Ok(Self {
            template,
            field_patterns,
            date_pattern,
            invoice_number_pattern,
        })
    }

    /// The compiled built-in template.
    pub fn builtin() -> Self {
        // Static data, checked by test_builtin_compiles.
        Self::compile(InvoiceTemplate::builtin()).expect("built-in template is valid")
    }

    pub fn template(&self) -> &InvoiceTemplate {
        &self.template
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.template.fields
    }

    pub fn keyword_sets(&self) -> &[CategoryKeywords] {
        &self.template.categories
    }

    /// Fields paired with their text pattern, in output order.
    pub fn field_patterns(&self) -> impl Iterator<Item = (&FieldSpec, Option<&Regex>)> {
        self.template
            .fields
            .iter()
            .zip(self.field_patterns.iter().map(Option::as_ref))
    }

    /// Fields read from one category's table.
    pub fn fields_for(&self, category: BillingCategory) -> impl Iterator<Item = &FieldSpec> {
        self.template.fields.iter().filter(move |f| f.category == category)
    }

    pub fn date_pattern(&self) -> &Regex {
        &self.date_pattern
    }

    pub fn invoice_number_pattern(&self) -> &Regex {
        &self.invoice_number_pattern
    }

    /// A record with the full canonical key set, every value the sentinel.
    pub fn empty_record(&self, backend: Backend) -> InvoiceRecord {
        InvoiceRecord::empty(self.template.field_names(), backend)
    }
}

fn compile_pattern(field: &str, pattern: &str) -> Result<Regex, TemplateError> {
    Regex::new(pattern).map_err(|source| TemplateError::Pattern {
        field: field.to_string(),
        source,
    })
}
