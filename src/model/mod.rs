//! A solver-agnostic mixed-integer linear program.
//!
//! A [`Model`] is plain data: named variables with their domains, named linear constraints and a
//! linear objective which is always minimised. Backends translate it into their own
//! representation when solving.

mod lp_format;
mod variable_names;

use std::fmt::Display;

use variable_names::VariableNames;

/// Builds up the model, from which a solver can be constructed.
#[derive(Clone, Debug, Default)]
pub struct Model {
    /// Every element denotes the domain of the variable with that id.
    domains: Vec<Domain>,
    names: VariableNames,
    /// The constraints in the model.
    constraints: Vec<LinearConstraint>,
    /// The objective terms, to be minimised.
    objective: Vec<Term>,
}

impl Model {
    /// Create a new variable which is either 0 or 1.
    pub fn new_binary_variable(&mut self, name: impl Display) -> VariableId {
        self.new_variable(name, Domain::Binary)
    }

    /// Create a new integer variable in `[lower_bound, upper_bound]`.
    pub fn new_integer_variable(
        &mut self,
        name: impl Display,
        lower_bound: i32,
        upper_bound: i32,
    ) -> VariableId {
        self.new_variable(
            name,
            Domain::Integer {
                lower_bound,
                upper_bound,
            },
        )
    }

    fn new_variable(&mut self, name: impl Display, domain: Domain) -> VariableId {
        let id = VariableId(self.domains.len());

        self.domains.push(domain);
        self.names.add(id, name.to_string());

        id
    }

    /// Add a constraint to the model.
    ///
    /// It is important to only use constraints with variables created on the same instance of
    /// [`Model`].
    pub fn add_constraint(&mut self, constraint: LinearConstraint) {
        self.constraints.push(constraint);
    }

    /// Set the objective to minimise the sum of `terms`.
    pub fn minimise(&mut self, terms: impl IntoIterator<Item = Term>) {
        self.objective = terms.into_iter().collect();
    }

    pub fn num_variables(&self) -> usize {
        self.domains.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Iterate over all variables in the order they were created.
    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &str, Domain)> + '_ {
        self.domains
            .iter()
            .enumerate()
            .map(|(idx, domain)| (VariableId(idx), self.names.get_name(VariableId(idx)), *domain))
    }

    pub fn domain(&self, variable: VariableId) -> Domain {
        self.domains[variable.0]
    }

    pub fn name(&self, variable: VariableId) -> &str {
        self.names.get_name(variable)
    }

    /// Get a variable by its name.
    pub fn variable_by_name(&self, name: &str) -> Option<VariableId> {
        self.names.get_by_name(name)
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn objective(&self) -> &[Term] {
        &self.objective
    }

    /// Evaluate the objective for an assignment indexed by [`VariableId::index`].
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        evaluate(&self.objective, values)
    }
}

/// Identifies a variable of a [`Model`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableId(usize);

impl VariableId {
    /// The position of this variable in [`Model::variables`].
    pub fn index(&self) -> usize {
        self.0
    }

    /// The term `coefficient * self`.
    pub fn scaled(self, coefficient: f64) -> Term {
        Term {
            variable: self,
            coefficient,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Domain {
    Binary,
    Integer { lower_bound: i32, upper_bound: i32 },
}

impl Domain {
    pub fn contains(&self, value: f64, tolerance: f64) -> bool {
        let (lower_bound, upper_bound) = match *self {
            Domain::Binary => (0.0, 1.0),
            Domain::Integer {
                lower_bound,
                upper_bound,
            } => (f64::from(lower_bound), f64::from(upper_bound)),
        };

        (value - value.round()).abs() <= tolerance
            && value >= lower_bound - tolerance
            && value <= upper_bound + tolerance
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Term {
    pub variable: VariableId,
    pub coefficient: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    LessOrEqual,
    GreaterOrEqual,
}

/// `name: sum(terms) <comparison> rhs`
#[derive(Clone, Debug, PartialEq)]
pub struct LinearConstraint {
    pub name: String,
    pub terms: Vec<Term>,
    pub comparison: Comparison,
    pub rhs: f64,
}

impl LinearConstraint {
    pub fn new(
        name: impl Display,
        terms: impl IntoIterator<Item = Term>,
        comparison: Comparison,
        rhs: f64,
    ) -> Self {
        LinearConstraint {
            name: name.to_string(),
            terms: terms.into_iter().collect(),
            comparison,
            rhs,
        }
    }

    /// Whether the assignment `values`, indexed by [`VariableId::index`], satisfies this
    /// constraint.
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = evaluate(&self.terms, values);

        match self.comparison {
            Comparison::Equal => (lhs - self.rhs).abs() <= tolerance,
            Comparison::LessOrEqual => lhs <= self.rhs + tolerance,
            Comparison::GreaterOrEqual => lhs >= self.rhs - tolerance,
        }
    }
}

fn evaluate(terms: &[Term], values: &[f64]) -> f64 {
    terms
        .iter()
        .map(|term| term.coefficient * values[term.variable.0])
        .sum()
}
