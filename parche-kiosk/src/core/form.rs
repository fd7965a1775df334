//! Survey form state
//!
//! Holds the in-progress draft: four category ratings, the invoice and
//! table numbers and the free-text comment. Validation happens here so a
//! rejected draft never reaches the network layer.

use shared::{Category, InvalidRating, Rating, RatingSubmission, TablePolicy};
use thiserror::Error;

/// Comment length limit, counted in characters
pub const COMMENT_MAX_CHARS: usize = 500;

pub const TABLE_REQUIRED_HINT: &str = "Este campo es obligatorio";
pub const TABLE_OPTIONAL_HINT: &str = "Opcional";
pub const TABLE_MISSING_ERROR: &str = "Debes ingresar el número de mesa";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    RatingOutOfRange(#[from] InvalidRating),

    #[error("Faltan categorías por calificar: {}", .0.iter().map(|c| c.label()).collect::<Vec<_>>().join(", "))]
    MissingRatings(Vec<Category>),

    #[error("{}", TABLE_MISSING_ERROR)]
    TableRequired,
}

/// Input fields that can hold focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Invoice,
    Table,
    Comment,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SurveyForm {
    ratings: [Option<Rating>; 4],
    /// Raw text typed on the invoice screen
    invoice_input: String,
    /// Value attached to the submission (prefixed, upper-cased)
    invoice_number: String,
    /// Raw table input; trimmed when read
    table_input: String,
    comment: String,
    table_error: Option<&'static str>,
    focus: Option<FormField>,
}

impl SurveyForm {
    pub fn new() -> Self {
        Self::default()
    }

    // ========== Ratings ==========

    pub fn set_rating(&mut self, category: Category, value: u8) -> Result<Rating, FormError> {
        let rating = Rating::new(value)?;
        self.ratings[category.index()] = Some(rating);
        tracing::debug!(%category, %rating, "Rating");
        Ok(rating)
    }

    pub fn rating(&self, category: Category) -> Option<Rating> {
        self.ratings[category.index()]
    }

    /// Categories still without a rating
    pub fn missing(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| self.rating(*c).is_none())
            .collect()
    }

    pub fn all_rated(&self) -> bool {
        self.ratings.iter().all(Option::is_some)
    }

    // ========== Invoice ==========

    pub fn set_invoice_input(&mut self, raw: &str) {
        self.invoice_input = raw.to_string();
    }

    pub fn invoice_input(&self) -> &str {
        &self.invoice_input
    }

    /// Confirm the invoice step: `<prefix><INPUT>` with the input upper-cased and trimmed
    pub fn apply_invoice(&mut self, prefix: &str) {
        let typed = self.invoice_input.to_uppercase();
        self.invoice_number = format!("{prefix}{}", typed.trim());
    }

    /// Skipping the invoice step sends an empty invoice number
    pub fn skip_invoice(&mut self) {
        self.invoice_number.clear();
    }

    pub fn invoice_number(&self) -> &str {
        &self.invoice_number
    }

    // ========== Table ==========

    pub fn set_table_number(&mut self, raw: &str) {
        self.table_input = raw.to_string();
        self.table_error = None;
    }

    /// Table number with surrounding whitespace removed
    pub fn table_number(&self) -> &str {
        self.table_input.trim()
    }

    pub fn table_input(&self) -> &str {
        &self.table_input
    }

    pub fn table_error(&self) -> Option<&'static str> {
        self.table_error
    }

    /// Hint under the table field; `None` when the field is hidden
    pub fn table_hint(&self, policy: TablePolicy) -> Option<&'static str> {
        match policy {
            TablePolicy::NotRequested => None,
            _ if self.table_error.is_some() => self.table_error,
            TablePolicy::Required => Some(TABLE_REQUIRED_HINT),
            TablePolicy::Optional => Some(TABLE_OPTIONAL_HINT),
        }
    }

    fn table_satisfied(&self, policy: TablePolicy) -> bool {
        !policy.is_required() || !self.table_number().is_empty()
    }

    // ========== Comment ==========

    /// Store the comment, cut at [`COMMENT_MAX_CHARS`]
    pub fn set_comment(&mut self, text: &str) {
        self.comment = text.chars().take(COMMENT_MAX_CHARS).collect();
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn char_count(&self) -> usize {
        self.comment.chars().count()
    }

    // ========== Focus ==========

    pub fn focus(&self) -> Option<FormField> {
        self.focus
    }

    pub fn focus_on(&mut self, field: FormField) {
        self.focus = Some(field);
    }

    // ========== Lifecycle ==========

    /// Empty draft: no ratings, empty invoice/table/comment, no field errors
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// All categories rated and the table policy satisfied
    pub fn is_ready(&self, policy: TablePolicy) -> bool {
        self.all_rated() && self.table_satisfied(policy)
    }

    /// Whether the submit control is enabled
    pub fn submit_enabled(&self, policy: TablePolicy) -> bool {
        self.is_ready(policy)
    }

    /// Validate and freeze the draft. A missing required table number marks
    /// the field with an error and moves focus to it.
    pub fn build_submission(
        &mut self,
        site_id: &str,
        policy: TablePolicy,
    ) -> Result<RatingSubmission, FormError> {
        let [Some(servicio), Some(comida), Some(infraestructura), Some(musica)] = self.ratings
        else {
            return Err(FormError::MissingRatings(self.missing()));
        };

        if !self.table_satisfied(policy) {
            self.table_error = Some(TABLE_MISSING_ERROR);
            self.focus = Some(FormField::Table);
            return Err(FormError::TableRequired);
        }

        Ok(RatingSubmission {
            codigo_pv: site_id.to_string(),
            numero_factura: self.invoice_number.clone(),
            numero_mesa: self.table_number().to_string(),
            servicio,
            comida,
            infraestructura,
            musica,
            comentario: self.comment.clone(),
        })
    }
}
