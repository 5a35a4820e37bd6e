use good_lp::solvers::ResolutionError;
use good_lp::variable;
use good_lp::Expression;
use good_lp::ProblemVariables;
use good_lp::Solution as _;
use good_lp::SolverModel;
use good_lp::Variable;
use good_lp::VariableDefinition;

use super::MilpBackend;
use super::Solution;
use super::SolveOutcome;
use crate::model::Comparison;
use crate::model::Domain;
use crate::model::Model;
use crate::model::Term;

/// Solves models with the default solver of `good_lp`, the pure-Rust `microlp` branch-and-bound
/// solver.
#[derive(Clone, Copy, Debug, Default)]
pub struct GoodLpBackend;

impl MilpBackend for GoodLpBackend {
    fn solve(&self, model: &Model) -> SolveOutcome {
        let mut problem = ProblemVariables::new();

        let variables: Vec<Variable> = model
            .variables()
            .map(|(_, name, domain)| problem.add(definition(name, domain)))
            .collect();

        let objective = expression(model.objective(), &variables);
        let mut lp = problem
            .minimise(objective.clone())
            .using(good_lp::default_solver);

        for constraint in model.constraints() {
            let lhs = expression(&constraint.terms, &variables);

            lp = lp.with(match constraint.comparison {
                Comparison::Equal => good_lp::constraint::eq(lhs, constraint.rhs),
                Comparison::LessOrEqual => good_lp::constraint::leq(lhs, constraint.rhs),
                Comparison::GreaterOrEqual => good_lp::constraint::geq(lhs, constraint.rhs),
            });
        }

        match lp.solve() {
            Ok(solution) => {
                let values: Vec<f64> = variables
                    .iter()
                    .map(|&variable| solution.value(variable))
                    .collect();
                let objective_value = solution.eval(objective);

                SolveOutcome::Optimal(Solution::new(values, objective_value))
            }
            Err(ResolutionError::Infeasible) => SolveOutcome::Infeasible,
            Err(ResolutionError::Unbounded) => SolveOutcome::Unbounded,
            Err(error) => SolveOutcome::Error(error.to_string()),
        }
    }
}

fn definition(name: &str, domain: Domain) -> VariableDefinition {
    let definition = variable().name(name);

    match domain {
        Domain::Binary => definition.binary(),
        Domain::Integer {
            lower_bound,
            upper_bound,
        } => definition.integer().min(lower_bound).max(upper_bound),
    }
}

fn expression(terms: &[Term], variables: &[Variable]) -> Expression {
    let mut expression = Expression::with_capacity(terms.len());

    for term in terms {
        expression.add_mul(term.coefficient, variables[term.variable.index()]);
    }

    expression
}
