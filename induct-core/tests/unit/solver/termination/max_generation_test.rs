use super::*;

fn context_at(generation: usize) -> EvolutionContext {
    EvolutionContext { generation, front_mean_history: Vec::new() }
}

parameterized_test! {can_stop_at_generation_budget, (limit, generation, expected), {
    assert_eq!(MaxGeneration::new(limit).is_termination(&context_at(generation)), expected);
}}

can_stop_at_generation_budget! {
    case_01_below: (10, 9, false),
    case_02_at: (10, 10, true),
    case_03_above: (10, 11, true),
}

#[test]
fn can_report_budget_reason() {
    assert_eq!(MaxGeneration::new(1).reason(), StopReason::GenerationBudget);
}
