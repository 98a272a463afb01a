use std::collections::BTreeSet;

use super::RenderContext;
use crate::expense_form::ExpenseDraft;
use crate::state::FormMode;

pub const FORM_ID: &str = "expense-form";
pub const CANCEL_ID: &str = "cancel-edit";
pub const REMOVE_ID: &str = "remove-expense";
pub const PROPOSAL_LIST_ID: &str = "description-proposals";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposalOption {
    pub value: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseFormView {
    pub mode: FormMode,
    pub draft: ExpenseDraft,
    pub proposals: Vec<ProposalOption>,
    /// Field ids flagged by the last failed submit.
    pub flagged: BTreeSet<String>,
    pub can_delete: bool,
    pub default_currency: String,
    pub caret: Option<usize>,
}

impl ExpenseFormView {
    pub fn is_flagged(&self, element_id: &str) -> bool {
        self.flagged.contains(element_id)
    }
}

/// `None` while no form is open or its record is still loading.
pub fn build(ctx: &RenderContext<'_>) -> Option<ExpenseFormView> {
    let mode = ctx.state.form?;
    let draft = ctx.state.draft.clone()?;
    let selected = ctx.state.proposals.selected();

    Some(ExpenseFormView {
        mode,
        proposals: ctx
            .state
            .proposals
            .options()
            .iter()
            .enumerate()
            .map(|(idx, value)| ProposalOption {
                value: value.clone(),
                selected: selected == Some(idx),
            })
            .collect(),
        can_delete: mode == FormMode::Edit,
        draft,
        flagged: ctx.state.flagged.clone(),
        default_currency: ctx.default_currency.to_string(),
        caret: ctx.state.description_caret_position,
    })
}
