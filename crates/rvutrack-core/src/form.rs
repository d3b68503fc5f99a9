//! Observable input form.
//!
//! `ExamForm` holds the raw text of every input field and recalculates on
//! each change, pushing the new `TotalsView` to subscribed UI adapters. The
//! calculator itself knows nothing about subscribers.

use tracing::debug;

use crate::calculator::Calculator;
use crate::display::TotalsView;
use crate::error::FormError;

/// Initial text of every count field.
const INITIAL_COUNT_TEXT: &str = "0";

/// What subscribers receive after every recalculation.
#[derive(Debug, Clone, Copy)]
pub struct FormUpdate<'a> {
    pub count_texts: &'a [String],
    pub threshold_text: &'a str,
    pub view: &'a TotalsView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Box<dyn FnMut(FormUpdate<'_>) + Send>;

pub struct ExamForm {
    calculator: Calculator,
    count_texts: Vec<String>,
    threshold_text: String,
    view: TotalsView,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: u64,
}

impl ExamForm {
    /// Create the form with every count at zero and no threshold, and run
    /// the initial calculation.
    pub fn new(calculator: Calculator) -> Self {
        let count_texts = vec![INITIAL_COUNT_TEXT.to_string(); calculator.catalog().len()];
        let threshold_text = String::new();
        let view = calculator.view(&count_texts, &threshold_text);

        Self {
            calculator,
            count_texts,
            threshold_text,
            view,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    pub fn current(&self) -> &TotalsView {
        &self.view
    }

    pub fn count_texts(&self) -> &[String] {
        &self.count_texts
    }

    pub fn count_text(&self, index: usize) -> Option<&str> {
        self.count_texts.get(index).map(|s| s.as_str())
    }

    pub fn threshold_text(&self) -> &str {
        &self.threshold_text
    }

    /// Register a callback. It is called right away with the current state
    /// so the adapter can render before the first edit.
    pub fn subscribe<F>(&mut self, mut callback: F) -> SubscriptionId
    where
        F: FnMut(FormUpdate<'_>) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;

        callback(FormUpdate {
            count_texts: &self.count_texts,
            threshold_text: &self.threshold_text,
            view: &self.view,
        });
        self.subscribers.push((id, Box::new(callback)));
        debug!(subscription = id.0, "Form subscriber added");
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        self.subscribers.len() != before
    }

    pub fn set_count(&mut self, index: usize, text: impl Into<String>) -> Result<(), FormError> {
        let len = self.count_texts.len();
        let slot = self
            .count_texts
            .get_mut(index)
            .ok_or(FormError::IndexOutOfRange { index, len })?;
        *slot = text.into();
        self.recalculate();
        Ok(())
    }

    pub fn set_threshold(&mut self, text: impl Into<String>) {
        self.threshold_text = text.into();
        self.recalculate();
    }

    /// Put every field back to its initial value.
    pub fn reset(&mut self) {
        for text in &mut self.count_texts {
            *text = INITIAL_COUNT_TEXT.to_string();
        }
        self.threshold_text.clear();
        self.recalculate();
    }

    fn recalculate(&mut self) {
        self.view = self.calculator.view(&self.count_texts, &self.threshold_text);
        let update = FormUpdate {
            count_texts: &self.count_texts,
            threshold_text: &self.threshold_text,
            view: &self.view,
        };
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(update);
        }
    }
}
