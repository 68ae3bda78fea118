//! Conditions.
//!
//! A condition is a single predicate over the game state. Trigger
//! conditions, action gates and branch conditions all use the same
//! evaluator. Condition lists are AND-combined; an empty list is true.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::core::{EventRng, FlagValue, GameState};

use super::event::TriggerData;

/// What a condition inspects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionType {
    /// A flag, compared against `value`.
    Flag,
    /// Count of the inventory item whose id is `key`.
    Item,
    /// Player level.
    Level,
    /// In-game clock.
    Time,
    /// A roll against `probability`.
    Random,
    /// Evaluated by host code.
    Custom,
}

/// Comparison operator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[default]
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = "has")]
    Has,
    #[serde(rename = "not_has")]
    NotHas,
}

impl Operator {
    /// Whether an ordering between actual and expected satisfies this operator.
    ///
    /// `has`/`not_has` are presence tests and never accept an ordering.
    #[must_use]
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            Operator::Eq => ordering == Ordering::Equal,
            Operator::Ne => ordering != Ordering::Equal,
            Operator::Gt => ordering == Ordering::Greater,
            Operator::Lt => ordering == Ordering::Less,
            Operator::Ge => ordering != Ordering::Less,
            Operator::Le => ordering != Ordering::Greater,
            Operator::Has | Operator::NotHas => false,
        }
    }
}

/// A single condition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Optional id, used when a branch refers to this condition.
    #[serde(default)]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub condition_type: ConditionType,

    #[serde(default)]
    pub operator: Operator,

    /// Flag key, item id, or custom key.
    #[serde(default)]
    pub key: String,

    /// Value to compare against.
    #[serde(default)]
    pub value: Option<FlagValue>,

    /// Chance of success for `random` conditions.
    #[serde(default)]
    pub probability: Option<f64>,
}

impl Condition {
    fn new(condition_type: ConditionType, operator: Operator, key: impl Into<String>) -> Self {
        Self {
            id: None,
            condition_type,
            operator,
            key: key.into(),
            value: None,
            probability: None,
        }
    }

    /// Compare a flag against a value.
    pub fn flag(key: impl Into<String>, operator: Operator, value: impl Into<FlagValue>) -> Self {
        Self::new(ConditionType::Flag, operator, key).with_value(value)
    }

    /// Flag is present.
    pub fn flag_set(key: impl Into<String>) -> Self {
        Self::new(ConditionType::Flag, Operator::Has, key)
    }

    /// Flag is absent.
    pub fn flag_unset(key: impl Into<String>) -> Self {
        Self::new(ConditionType::Flag, Operator::NotHas, key)
    }

    /// Compare an item count.
    pub fn item(item_id: impl Into<String>, operator: Operator, count: i64) -> Self {
        Self::new(ConditionType::Item, operator, item_id).with_value(count)
    }

    /// Compare the player level.
    pub fn level(operator: Operator, level: i64) -> Self {
        Self::new(ConditionType::Level, operator, "").with_value(level)
    }

    /// Compare the in-game clock.
    pub fn time(operator: Operator, time: f64) -> Self {
        Self::new(ConditionType::Time, operator, "").with_value(time)
    }

    /// Succeed with the given probability.
    pub fn random(probability: f64) -> Self {
        let mut condition = Self::new(ConditionType::Random, Operator::Eq, "");
        condition.probability = Some(probability);
        condition
    }

    /// Host-evaluated condition.
    pub fn custom(key: impl Into<String>) -> Self {
        Self::new(ConditionType::Custom, Operator::Eq, key)
    }

    /// Set the comparison value (builder pattern).
    #[must_use]
    pub fn with_value(mut self, value: impl Into<FlagValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the condition id (builder pattern).
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Host evaluator for `custom` conditions.
pub type CustomConditionFn = dyn Fn(&Condition, &GameState, Option<&TriggerData>) -> bool + Send;

/// Context for evaluating conditions.
pub struct ConditionContext<'a> {
    /// Current game state.
    pub state: &'a GameState,
    /// Data supplied by whatever fired the event.
    pub trigger_data: Option<&'a TriggerData>,
    /// Source of rolls for `random` conditions.
    pub rng: &'a mut dyn EventRng,
    /// Custom condition evaluator (provided by host).
    pub eval_custom: Option<&'a CustomConditionFn>,
    /// Probability for `random` conditions without one.
    pub default_probability: f64,
}

impl<'a> ConditionContext<'a> {
    /// Create a new context.
    pub fn new(state: &'a GameState, rng: &'a mut dyn EventRng) -> Self {
        Self {
            state,
            trigger_data: None,
            rng,
            eval_custom: None,
            default_probability: 0.5,
        }
    }

    /// Attach trigger data.
    pub fn with_trigger_data(mut self, trigger_data: Option<&'a TriggerData>) -> Self {
        self.trigger_data = trigger_data;
        self
    }

    /// Add a custom condition evaluator.
    pub fn with_custom_eval(mut self, eval: Option<&'a CustomConditionFn>) -> Self {
        self.eval_custom = eval;
        self
    }

    /// Override the fallback probability.
    pub fn with_default_probability(mut self, probability: f64) -> Self {
        self.default_probability = probability;
        self
    }
}

/// Evaluator for conditions.
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Check if a condition is satisfied.
    pub fn evaluate(condition: &Condition, ctx: &mut ConditionContext) -> bool {
        let operator = condition.operator;
        let expected = condition.value.as_ref();

        match condition.condition_type {
            ConditionType::Flag => {
                compare_flag(ctx.state.flag(&condition.key), operator, expected)
            }

            ConditionType::Item => {
                compare_number(ctx.state.item_count(&condition.key) as f64, operator, expected)
            }

            ConditionType::Level => {
                compare_number(ctx.state.player_level as f64, operator, expected)
            }

            ConditionType::Time => compare_number(ctx.state.time, operator, expected),

            ConditionType::Random => {
                let probability = condition.probability.unwrap_or(ctx.default_probability);
                ctx.rng.next_f64() < probability
            }

            ConditionType::Custom => match ctx.eval_custom {
                Some(eval) => eval(condition, ctx.state, ctx.trigger_data),
                // No evaluator installed: custom conditions pass
                None => true,
            },
        }
    }

    /// AND over a list. Empty lists are true.
    pub fn all(conditions: &[Condition], ctx: &mut ConditionContext) -> bool {
        conditions.iter().all(|c| Self::evaluate(c, ctx))
    }
}

fn compare_flag(actual: Option<&FlagValue>, operator: Operator, expected: Option<&FlagValue>) -> bool {
    match operator {
        Operator::Has => actual.is_some(),
        Operator::NotHas => actual.is_none(),
        Operator::Eq => actual == expected,
        Operator::Ne => actual != expected,
        _ => match (actual, expected) {
            (Some(a), Some(b)) => a.compare(b).is_some_and(|o| operator.accepts(o)),
            _ => false,
        },
    }
}

fn compare_number(actual: f64, operator: Operator, expected: Option<&FlagValue>) -> bool {
    match operator {
        Operator::Has => actual > 0.0,
        Operator::NotHas => actual <= 0.0,
        _ => match expected.and_then(FlagValue::as_number) {
            Some(expected) => actual
                .partial_cmp(&expected)
                .is_some_and(|o| operator.accepts(o)),
            None => operator == Operator::Ne,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, InventoryItem};

    struct FixedRoll(f64);

    impl EventRng for FixedRoll {
        fn next_f64(&mut self) -> f64 {
            self.0
        }
    }

    fn check(condition: &Condition, state: &GameState) -> bool {
        let mut rng = GameRng::new(42);
        let mut ctx = ConditionContext::new(state, &mut rng);
        ConditionEvaluator::evaluate(condition, &mut ctx)
    }

    #[test]
    fn test_flag_comparisons() {
        let mut state = GameState::new();
        state.set_flag("gate", "open");
        state.set_flag("kills", 5);

        assert!(check(&Condition::flag("gate", Operator::Eq, "open"), &state));
        assert!(!check(&Condition::flag("gate", Operator::Eq, "closed"), &state));
        assert!(check(&Condition::flag("gate", Operator::Ne, "closed"), &state));
        assert!(check(&Condition::flag("kills", Operator::Ge, 5), &state));
        assert!(!check(&Condition::flag("kills", Operator::Gt, 5), &state));
        assert!(check(&Condition::flag("kills", Operator::Lt, 10), &state));
    }

    #[test]
    fn test_flag_mismatched_kinds() {
        let mut state = GameState::new();
        state.set_flag("kills", 5);

        assert!(!check(&Condition::flag("kills", Operator::Eq, "5"), &state));
        assert!(check(&Condition::flag("kills", Operator::Ne, "5"), &state));
        assert!(!check(&Condition::flag("kills", Operator::Gt, "1"), &state));
    }

    #[test]
    fn test_missing_flag() {
        let state = GameState::new();

        assert!(!check(&Condition::flag("ghost", Operator::Eq, true), &state));
        assert!(check(&Condition::flag("ghost", Operator::Ne, true), &state));
        assert!(!check(&Condition::flag("ghost", Operator::Lt, 1), &state));
    }

    #[test]
    fn test_flag_has_not_has() {
        let mut state = GameState::new();
        state.set_flag("met_sage", false);

        assert!(check(&Condition::flag_set("met_sage"), &state));
        assert!(!check(&Condition::flag_unset("met_sage"), &state));
        assert!(!check(&Condition::flag_set("met_king"), &state));
        assert!(check(&Condition::flag_unset("met_king"), &state));
    }

    #[test]
    fn test_item_condition() {
        let mut state = GameState::new();
        state.add_item(InventoryItem::new("key", "Key", 2));

        assert!(check(&Condition::item("key", Operator::Ge, 2), &state));
        assert!(!check(&Condition::item("key", Operator::Gt, 2), &state));
        // Missing items count as zero
        assert!(check(&Condition::item("gem", Operator::Eq, 0), &state));

        let has_key = Condition {
            operator: Operator::Has,
            ..Condition::item("key", Operator::Eq, 0)
        };
        assert!(check(&has_key, &state));
    }

    #[test]
    fn test_level_and_time() {
        let mut state = GameState::new();
        state.player_level = 7;
        state.time = 30.0;

        assert!(check(&Condition::level(Operator::Ge, 5), &state));
        assert!(!check(&Condition::level(Operator::Lt, 7), &state));
        assert!(check(&Condition::time(Operator::Le, 30.0), &state));
        assert!(!check(&Condition::time(Operator::Gt, 30.0), &state));
    }

    #[test]
    fn test_random_condition() {
        let state = GameState::new();

        let mut low = FixedRoll(0.1);
        let mut ctx = ConditionContext::new(&state, &mut low);
        assert!(ConditionEvaluator::evaluate(&Condition::random(0.3), &mut ctx));

        let mut high = FixedRoll(0.9);
        let mut ctx = ConditionContext::new(&state, &mut high);
        assert!(!ConditionEvaluator::evaluate(&Condition::random(0.3), &mut ctx));
    }

    #[test]
    fn test_random_default_probability() {
        let state = GameState::new();
        let mut condition = Condition::random(0.0);
        condition.probability = None;

        let mut roll = FixedRoll(0.49);
        let mut ctx = ConditionContext::new(&state, &mut roll);
        assert!(ConditionEvaluator::evaluate(&condition, &mut ctx));

        let mut roll = FixedRoll(0.49);
        let mut ctx = ConditionContext::new(&state, &mut roll).with_default_probability(0.2);
        assert!(!ConditionEvaluator::evaluate(&condition, &mut ctx));
    }

    #[test]
    fn test_custom_condition() {
        let state = GameState::new();
        let mut rng = GameRng::new(1);

        // Without evaluator
        let mut ctx = ConditionContext::new(&state, &mut rng);
        assert!(ConditionEvaluator::evaluate(&Condition::custom("anything"), &mut ctx));

        // With evaluator
        let eval = |condition: &Condition, _state: &GameState, _data: Option<&TriggerData>| {
            condition.key == "full_moon"
        };
        let mut ctx = ConditionContext::new(&state, &mut rng).with_custom_eval(Some(&eval));
        assert!(ConditionEvaluator::evaluate(&Condition::custom("full_moon"), &mut ctx));
        assert!(!ConditionEvaluator::evaluate(&Condition::custom("new_moon"), &mut ctx));
    }

    #[test]
    fn test_all_combinator() {
        let mut state = GameState::new();
        state.set_flag("a", true);
        let mut rng = GameRng::new(1);
        let mut ctx = ConditionContext::new(&state, &mut rng);

        assert!(ConditionEvaluator::all(&[], &mut ctx));
        assert!(ConditionEvaluator::all(
            &[Condition::flag_set("a"), Condition::level(Operator::Eq, 1)],
            &mut ctx
        ));
        assert!(!ConditionEvaluator::all(
            &[Condition::flag_set("a"), Condition::flag_set("b")],
            &mut ctx
        ));
    }

    #[test]
    fn test_condition_deserialization() {
        let json = r#"{"type":"item","operator":">=","key":"potion","value":3}"#;
        let condition: Condition = serde_json::from_str(json).unwrap();

        assert_eq!(condition, Condition::item("potion", Operator::Ge, 3));
    }

    #[test]
    fn test_operator_names() {
        let json = serde_json::to_string(&Operator::NotHas).unwrap();
        assert_eq!(json, "\"not_has\"");
        let op: Operator = serde_json::from_str("\"<=\"").unwrap();
        assert_eq!(op, Operator::Le);
    }
}
