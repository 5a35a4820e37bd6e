//! Export of a [`Model`] in the CPLEX LP text format, for inspecting a model with external tools.

use std::io;
use std::io::Write;

use super::Comparison;
use super::Domain;
use super::Model;
use super::Term;

impl Model {
    /// Write the model in CPLEX LP format. Constraints appear in the order they were added.
    pub fn write_lp(&self, writer: &mut impl Write) -> io::Result<()> {
        writeln!(writer, "Minimize")?;
        write!(writer, " obj:")?;
        self.write_terms(writer, &self.objective)?;
        writeln!(writer)?;

        writeln!(writer, "Subject To")?;
        for constraint in &self.constraints {
            write!(writer, " {}:", constraint.name)?;
            self.write_terms(writer, &constraint.terms)?;

            let comparison = match constraint.comparison {
                Comparison::Equal => "=",
                Comparison::LessOrEqual => "<=",
                Comparison::GreaterOrEqual => ">=",
            };
            writeln!(writer, " {comparison} {}", constraint.rhs)?;
        }

        writeln!(writer, "Bounds")?;
        for (_, name, domain) in self.variables() {
            if let Domain::Integer {
                lower_bound,
                upper_bound,
            } = domain
            {
                writeln!(writer, " {lower_bound} <= {name} <= {upper_bound}")?;
            }
        }

        self.write_section(writer, "Binaries", |domain| domain == Domain::Binary)?;
        self.write_section(writer, "Generals", |domain| {
            matches!(domain, Domain::Integer { .. })
        })?;

        writeln!(writer, "End")
    }

    fn write_terms(&self, writer: &mut impl Write, terms: &[Term]) -> io::Result<()> {
        if terms.is_empty() {
            return write!(writer, " 0");
        }

        for (idx, term) in terms.iter().enumerate() {
            let sign = if term.coefficient < 0.0 { "-" } else { "+" };
            let magnitude = term.coefficient.abs();
            let name = self.name(term.variable);

            match (idx, magnitude == 1.0) {
                (0, true) if sign == "+" => write!(writer, " {name}")?,
                (0, false) if sign == "+" => write!(writer, " {magnitude} {name}")?,
                (_, true) => write!(writer, " {sign} {name}")?,
                (_, false) => write!(writer, " {sign} {magnitude} {name}")?,
            }
        }

        Ok(())
    }

    fn write_section(
        &self,
        writer: &mut impl Write,
        header: &str,
        include: impl Fn(Domain) -> bool,
    ) -> io::Result<()> {
        writeln!(writer, "{header}")?;
        for (_, name, domain) in self.variables() {
            if include(domain) {
                writeln!(writer, " {name}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::model::Comparison;
    use crate::model::LinearConstraint;
    use crate::model::Model;

    #[test]
    fn writes_all_sections() {
        let mut model = Model::default();
        let x = model.new_binary_variable("x_0_1");
        let u = model.new_integer_variable("u_1", 1, 2);
        model.minimise([x.scaled(3.0)]);
        model.add_constraint(LinearConstraint::new(
            "mtz",
            [u.scaled(1.0), x.scaled(-2.0)],
            Comparison::LessOrEqual,
            1.0,
        ));

        let mut buffer = Vec::new();
        model.write_lp(&mut buffer).expect("writing to a vec succeeds");
        let lp = String::from_utf8(buffer).expect("lp output is utf-8");

        assert_eq!(
            lp,
            "Minimize\n obj: 3 x_0_1\nSubject To\n mtz: u_1 - 2 x_0_1 <= 1\nBounds\n 1 <= u_1 <= 2\nBinaries\n x_0_1\nGenerals\n u_1\nEnd\n"
        );
    }
}
