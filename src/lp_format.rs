//! The .lp file format.
//!
//! Traits to be implemented by structures that can be dumped in the .lp
//! format, and a reader for the same dialect.
use std::borrow::Cow;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::fmt::Formatter;
use std::io::prelude::*;
use std::io::Result;

use tempfile::NamedTempFile;

use crate::error::NativeError;
use crate::variable::VarType;

/// Optimization sense
#[derive(Clone, Copy, Eq, PartialEq, Debug, Default)]
pub enum LpObjective {
    /// min
    #[default]
    Minimize,
    /// max
    Maximize,
}

/// It's the user's responsibility to ensure
/// that the variable names used by types implementing this trait
/// follow the solver's requirements.
pub trait WriteToLpFileFormat {
    /// Write the object to the given formatter in the .lp format
    fn to_lp_file_format(&self, f: &mut fmt::Formatter) -> fmt::Result;
}

/// A type that represents a variable. See [crate::native::ViewVariable].
pub trait AsVariable {
    /// Variable name. Needs to be unique. See [crate::util::UniqueNameGenerator]
    fn name(&self) -> &str;
    /// Continuous, integer or binary
    fn var_type(&self) -> VarType;
    /// Minimum allowed value for the variable
    fn lower_bound(&self) -> f64;
    /// Maximum allowed value for the variable
    fn upper_bound(&self) -> f64;
    /// Whether the variable is forced to take only integer values
    fn is_integer(&self) -> bool {
        self.var_type().is_integral()
    }
}

/// A named constraint expressing a relation between an expression and a constant
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint<E> {
    /// row name, unique in the problem
    pub name: String,
    /// left hand side of the constraint
    pub lhs: E,
    /// '<=' '=' or '>='
    pub operator: Ordering,
    /// Right-hand side of the constraint
    pub rhs: f64,
}

impl<E: WriteToLpFileFormat> WriteToLpFileFormat for Constraint<E> {
    fn to_lp_file_format(&self, f: &mut Formatter) -> fmt::Result {
        self.lhs.to_lp_file_format(f)?;
        write!(f, " {} {}", operator_str(self.operator), self.rhs)
    }
}

fn operator_str(operator: Ordering) -> &'static str {
    match operator {
        Ordering::Equal => "=",
        Ordering::Less => "<=",
        Ordering::Greater => ">=",
    }
}

/// A sparse linear row whose variables are referenced by column position
#[derive(Debug, Clone)]
pub struct NamedTerms<'a> {
    /// (column, coefficient) pairs
    pub terms: Cow<'a, [(usize, f64)]>,
    /// name of every column of the problem
    pub names: &'a [String],
}

impl<'a> WriteToLpFileFormat for NamedTerms<'a> {
    fn to_lp_file_format(&self, f: &mut Formatter) -> fmt::Result {
        write_terms(
            f,
            self.terms
                .iter()
                .map(|&(col, coeff)| (self.names[col].as_str(), coeff)),
            self.names.first().map(String::as_str),
        )
    }
}

/// Write `2 x - y + 3.5 z`. Zero coefficients are skipped; a row without any
/// non-zero term is written as `0 <placeholder>`.
pub fn write_terms<'n>(
    f: &mut Formatter,
    terms: impl Iterator<Item = (&'n str, f64)>,
    placeholder: Option<&str>,
) -> fmt::Result {
    let mut first = true;
    for (name, coeff) in terms.filter(|&(_, c)| c != 0.0) {
        let abs = coeff.abs();
        match (first, coeff < 0.0) {
            (true, true) => f.write_str("- ")?,
            (true, false) => {}
            (false, true) => f.write_str(" - ")?,
            (false, false) => f.write_str(" + ")?,
        }
        if abs != 1.0 {
            write!(f, "{} ", abs)?;
        }
        f.write_str(name)?;
        first = false;
    }
    if first {
        match placeholder {
            Some(name) => write!(f, "0 {}", name)?,
            None => f.write_str("0")?,
        }
    }
    Ok(())
}

/// Implemented by type that can be formatted as an lp problem
pub trait LpProblem<'a>: Sized {
    /// variable type
    type Variable: AsVariable;
    /// expression type
    type Expression: WriteToLpFileFormat;
    /// Iterator over constraints
    type ConstraintIterator: Iterator<Item = Constraint<Self::Expression>>;
    /// Iterator over variables
    type VariableIterator: Iterator<Item = Self::Variable>;

    /// problem name. "lp_modeling_problem" by default
    fn name(&self) -> &str {
        "lp_modeling_problem"
    }
    /// Variables of the problem
    fn variables(&'a self) -> Self::VariableIterator;
    /// Target objective function
    fn objective(&'a self) -> Self::Expression;
    /// Whether to maximize or minimize the objective
    fn sense(&'a self) -> LpObjective;
    /// List of constraints to apply
    fn constraints(&'a self) -> Self::ConstraintIterator;
    /// Write the problem in the lp file format to the given formatter
    fn to_lp_file_format(&'a self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "\\ {}\n\n", self.name())?;
        objective_lp_file_block(self, f)?;
        write_constraints_lp_file_block(self, f)?;
        write_bounds_lp_file_block(self, f)?;
        write!(f, "\nEnd\n")?;
        Ok(())
    }
    /// Return an object whose [fmt::Display] implementation is the problem in the .lp format
    fn display_lp(&'a self) -> DisplayedLp<'_, Self>
    where
        Self: Sized,
    {
        DisplayedLp(self)
    }

    /// Write the problem to a temporary file
    fn to_tmp_file(&'a self) -> Result<NamedTempFile>
    where
        Self: Sized,
    {
        let mut f = tempfile::Builder::new()
            .prefix(self.name())
            .suffix(".lp")
            .tempfile()?;
        write!(f, "{}", self.display_lp())?;
        f.flush()?;
        Ok(f)
    }
}

/// A problem whose `Display` implementation outputs valid .lp syntax
pub struct DisplayedLp<'a, P>(&'a P);

impl<'a, P: LpProblem<'a>> std::fmt::Display for DisplayedLp<'a, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.to_lp_file_format(f)
    }
}

fn objective_lp_file_block<'a>(
    prob: &'a impl LpProblem<'a>,
    f: &mut std::fmt::Formatter,
) -> std::fmt::Result {
    let obj_type = match prob.sense() {
        LpObjective::Maximize => "Maximize\n  ",
        LpObjective::Minimize => "Minimize\n  ",
    };
    write!(f, "{}obj: ", obj_type)?;
    prob.objective().to_lp_file_format(f)?;
    writeln!(f)
}

fn write_constraints_lp_file_block<'a>(
    prob: &'a impl LpProblem<'a>,
    f: &mut std::fmt::Formatter,
) -> std::fmt::Result {
    let mut wrote_header = false;
    for constraint in prob.constraints() {
        if !wrote_header {
            write!(f, "\nSubject To\n")?;
            wrote_header = true;
        }
        write!(f, "  {}: ", constraint.name)?;
        constraint.to_lp_file_format(f)?;
        writeln!(f)?;
    }
    Ok(())
}

fn write_bounds_lp_file_block<'a>(prob: &'a impl LpProblem<'a>, f: &mut Formatter) -> fmt::Result {
    let mut integers = vec![];
    let mut binaries = vec![];
    write!(f, "\nBounds\n")?;
    for variable in prob.variables() {
        let low: f64 = variable.lower_bound();
        let up: f64 = variable.upper_bound();
        let name = variable.name().to_string();
        write!(f, "  ")?;
        if low == f64::NEG_INFINITY && up == f64::INFINITY {
            write!(f, "{} free", name)?;
        } else {
            if low == f64::NEG_INFINITY {
                write!(f, "-inf <= ")?;
            } else {
                write!(f, "{} <= ", low)?;
            }
            write!(f, "{}", name)?;
            if up < f64::INFINITY {
                write!(f, " <= {}", up)?;
            }
        }
        writeln!(f)?;
        match variable.var_type() {
            VarType::Integer => integers.push(name),
            VarType::Binary => binaries.push(name),
            VarType::Continuous => {}
        }
    }
    for (header, names) in [("Generals", integers), ("Binaries", binaries)] {
        if !names.is_empty() {
            writeln!(f, "\n{}", header)?;
            for name in names.iter() {
                writeln!(f, "  {}", name)?;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Reader
// ---------------------------------------------------------------------------

/// A variable read from an .lp file
#[derive(Debug, Clone, PartialEq)]
pub struct LpVariable {
    /// name as written in the file
    pub name: String,
    /// lower bound, 0 unless the Bounds section says otherwise
    pub lower_bound: f64,
    /// upper bound, INFINITY unless the Bounds section says otherwise
    pub upper_bound: f64,
    /// from the Generals and Binaries sections
    pub var_type: VarType,
}

/// The contents of an .lp file, see [parse_lp]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LpFile {
    /// problem name, from the leading `\ name` comment
    pub name: String,
    /// objective sense
    pub sense: LpObjective,
    /// objective terms
    pub objective: Vec<(String, f64)>,
    /// rows, constants already moved to the right hand side
    pub constraints: Vec<Constraint<Vec<(String, f64)>>>,
    /// variables, in the order of the Bounds section, then of first use
    pub variables: Vec<LpVariable>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Preamble,
    Objective,
    Constraints,
    Bounds,
    Generals,
    Binaries,
}

fn section_keyword(line: &str) -> Option<(Section, Option<LpObjective>)> {
    let lower = line.to_ascii_lowercase();
    let found = match lower.as_str() {
        "minimize" | "minimise" | "minimum" | "min" => {
            (Section::Objective, Some(LpObjective::Minimize))
        }
        "maximize" | "maximise" | "maximum" | "max" => {
            (Section::Objective, Some(LpObjective::Maximize))
        }
        "subject to" | "such that" | "st" | "s.t." => (Section::Constraints, None),
        "bounds" | "bound" => (Section::Bounds, None),
        "generals" | "general" | "gen" | "integers" => (Section::Generals, None),
        "binaries" | "binary" | "bin" => (Section::Binaries, None),
        _ => return None,
    };
    Some(found)
}

/// Whether a bare token would be read as something other than a name:
/// a number (`inf`, `nan`, `1e5`), a section keyword or a bound keyword
pub(crate) fn is_reserved_word(token: &str) -> bool {
    token.parse::<f64>().is_ok()
        || section_keyword(token).is_some()
        || ["end", "free", "subject", "such", "infinity"]
            .iter()
            .any(|word| token.eq_ignore_ascii_case(word))
}

/// Variables in the order they should become columns
#[derive(Default)]
struct VariableTable {
    by_name: HashMap<String, usize>,
    variables: Vec<LpVariable>,
    bounds_order: Vec<usize>,
}

impl VariableTable {
    fn get(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.by_name.get(name) {
            return idx;
        }
        let idx = self.variables.len();
        self.variables.push(LpVariable {
            name: name.to_string(),
            lower_bound: 0.0,
            upper_bound: f64::INFINITY,
            var_type: VarType::Continuous,
        });
        self.by_name.insert(name.to_string(), idx);
        idx
    }

    fn into_ordered(self) -> Vec<LpVariable> {
        let mut placed = vec![false; self.variables.len()];
        let mut order = Vec::with_capacity(self.variables.len());
        for idx in self.bounds_order.into_iter().chain(0..self.variables.len()) {
            if !placed[idx] {
                placed[idx] = true;
                order.push(idx);
            }
        }
        let mut slots: Vec<Option<LpVariable>> = self.variables.into_iter().map(Some).collect();
        order.into_iter().filter_map(|idx| slots[idx].take()).collect()
    }
}

fn parse_error(line: usize, message: impl Into<String>) -> NativeError {
    NativeError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_number(token: &str) -> Option<f64> {
    let value: f64 = token.trim().parse().ok()?;
    // values of 1e30 and beyond mean "no bound" in the .lp format
    if value >= 1e30 {
        Some(f64::INFINITY)
    } else if value <= -1e30 {
        Some(f64::NEG_INFINITY)
    } else {
        Some(value)
    }
}

fn is_valid_name(token: &str) -> bool {
    token
        .chars()
        .next()
        .map_or(false, |c| !c.is_ascii_digit() && c != '.')
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_.!\"#$%&()/,;?@'`{}|~[]".contains(c))
}

/// Parse `2 x - y + 3` into terms and a constant
fn parse_terms(text: &str, line: usize) -> std::result::Result<(Vec<(String, f64)>, f64), NativeError> {
    let mut terms = Vec::new();
    let mut constant = 0.0;
    let mut sign = 1.0;
    let mut coeff: Option<f64> = None;
    for token in text.split_whitespace() {
        let mut token = token;
        loop {
            let negative = token.starts_with('-');
            if !negative && !token.starts_with('+') {
                break;
            }
            // a sign after a bare number closes a constant term
            if let Some(c) = coeff.take() {
                constant += sign * c;
                sign = 1.0;
            }
            if negative {
                sign = -sign;
            }
            token = &token[1..];
            if token.parse::<f64>().is_ok() {
                break;
            }
        }
        if token.is_empty() {
            continue;
        }
        if let Ok(value) = token.parse::<f64>() {
            if coeff.is_some() {
                return Err(parse_error(line, format!("unexpected number '{}'", token)));
            }
            coeff = Some(value);
        } else if is_valid_name(token) {
            terms.push((token.to_string(), sign * coeff.take().unwrap_or(1.0)));
            sign = 1.0;
        } else {
            return Err(parse_error(line, format!("invalid token '{}'", token)));
        }
    }
    if let Some(c) = coeff {
        constant += sign * c;
    } else if sign != 1.0 {
        return Err(parse_error(line, "dangling sign"));
    }
    Ok((terms, constant))
}

/// Split `a <= x <= b` into its operands and relations
fn split_relations(text: &str) -> (Vec<&str>, Vec<Ordering>) {
    let bytes = text.as_bytes();
    let mut operands = Vec::new();
    let mut operators = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        let (op, width) = match (bytes[i], bytes.get(i + 1)) {
            (b'<', Some(b'=')) | (b'=', Some(b'<')) => (Ordering::Less, 2),
            (b'>', Some(b'=')) | (b'=', Some(b'>')) => (Ordering::Greater, 2),
            (b'<', _) => (Ordering::Less, 1),
            (b'>', _) => (Ordering::Greater, 1),
            (b'=', _) => (Ordering::Equal, 1),
            _ => {
                i += 1;
                continue;
            }
        };
        operands.push(text[start..i].trim());
        operators.push(op);
        i += width;
        start = i;
    }
    operands.push(text[start..].trim());
    (operands, operators)
}

fn split_label(text: &str) -> (Option<&str>, &str) {
    match text.split_once(':') {
        Some((label, rest)) => (Some(label.trim()), rest),
        None => (None, text),
    }
}

fn parse_bound(
    text: &str,
    line: usize,
    table: &mut VariableTable,
) -> std::result::Result<(), NativeError> {
    let tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() == 2 && tokens[1].eq_ignore_ascii_case("free") {
        let idx = table.get(tokens[0]);
        table.bounds_order.push(idx);
        let var = &mut table.variables[idx];
        var.lower_bound = f64::NEG_INFINITY;
        var.upper_bound = f64::INFINITY;
        return Ok(());
    }
    let (operands, operators) = split_relations(text);
    let bad = || parse_error(line, format!("invalid bound '{}'", text));
    let number = |s: &str| parse_number(s).ok_or_else(bad);
    let (name, lower, upper) = match (operands.as_slice(), operators.as_slice()) {
        ([a, name, b], [Ordering::Less, Ordering::Less]) => {
            (*name, Some(number(*a)?), Some(number(*b)?))
        }
        ([a, name, b], [Ordering::Greater, Ordering::Greater]) => {
            (*name, Some(number(*b)?), Some(number(*a)?))
        }
        ([left, right], [op]) => {
            let (name, value, op) = match parse_number(left) {
                Some(value) => (*right, value, op.reverse()),
                None => (*left, number(*right)?, *op),
            };
            match op {
                Ordering::Less => (name, None, Some(value)),
                Ordering::Greater => (name, Some(value), None),
                Ordering::Equal => (name, Some(value), Some(value)),
            }
        }
        _ => return Err(bad()),
    };
    if !is_valid_name(name) {
        return Err(bad());
    }
    let idx = table.get(name);
    table.bounds_order.push(idx);
    let var = &mut table.variables[idx];
    if let Some(lower) = lower {
        var.lower_bound = lower;
    }
    if let Some(upper) = upper {
        var.upper_bound = upper;
    }
    Ok(())
}

/// Read a problem written in the .lp format.
///
/// Supports the dialect written by [LpProblem::to_lp_file_format]: one row
/// per line, an objective, and the Bounds, Generals and Binaries sections.
pub fn parse_lp(text: &str) -> std::result::Result<LpFile, NativeError> {
    let mut file = LpFile::default();
    let mut table = VariableTable::default();
    let mut section = Section::Preamble;
    let mut objective: Vec<(usize, f64)> = Vec::new();
    let mut rows: Vec<(String, Vec<(usize, f64)>, Ordering, f64)> = Vec::new();

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let (content, comment) = match raw.split_once('\\') {
            Some((content, comment)) => (content, Some(comment)),
            None => (raw, None),
        };
        if section == Section::Preamble && file.name.is_empty() {
            if let Some(comment) = comment {
                file.name = comment.trim().to_string();
            }
        }
        let content = content.trim();
        if content.is_empty() {
            continue;
        }
        if content.eq_ignore_ascii_case("end") {
            break;
        }
        if let Some((next, sense)) = section_keyword(content) {
            section = next;
            if let Some(sense) = sense {
                file.sense = sense;
            }
            continue;
        }
        match section {
            Section::Preamble => {
                return Err(parse_error(line_no, "expected an objective section"));
            }
            Section::Objective => {
                let (_, expr) = split_label(content);
                let (terms, _) = parse_terms(expr, line_no)?;
                objective.extend(terms.into_iter().map(|(n, c)| (table.get(&n), c)));
            }
            Section::Constraints => {
                let (label, body) = split_label(content);
                let (operands, operators) = split_relations(body);
                let (lhs, op, rhs) = match (operands.as_slice(), operators.as_slice()) {
                    ([lhs, rhs], [op]) => (*lhs, *op, *rhs),
                    _ => {
                        return Err(parse_error(
                            line_no,
                            "a constraint needs exactly one relation",
                        ))
                    }
                };
                let (terms, constant) = parse_terms(lhs, line_no)?;
                let rhs = parse_number(rhs)
                    .ok_or_else(|| parse_error(line_no, format!("invalid right hand side '{}'", rhs)))?;
                let name = label.map_or_else(|| format!("R{}", rows.len() + 1), str::to_string);
                let terms = terms.into_iter().map(|(n, c)| (table.get(&n), c)).collect();
                rows.push((name, terms, op, rhs - constant));
            }
            Section::Bounds => parse_bound(content, line_no, &mut table)?,
            Section::Generals | Section::Binaries => {
                for name in content.split_whitespace() {
                    let idx = table.get(name);
                    let var = &mut table.variables[idx];
                    if section == Section::Binaries {
                        var.var_type = VarType::Binary;
                        var.lower_bound = var.lower_bound.max(0.0);
                        var.upper_bound = var.upper_bound.min(1.0);
                    } else if var.var_type != VarType::Binary {
                        var.var_type = VarType::Integer;
                    }
                }
            }
        }
    }

    let names: Vec<String> = table.variables.iter().map(|v| v.name.clone()).collect();
    let named = |terms: Vec<(usize, f64)>| -> Vec<(String, f64)> {
        terms.into_iter().map(|(idx, c)| (names[idx].clone(), c)).collect()
    };
    file.objective = named(objective);
    file.constraints = rows
        .into_iter()
        .map(|(name, terms, operator, rhs)| Constraint {
            name,
            lhs: named(terms),
            operator,
            rhs,
        })
        .collect();
    file.variables = table.into_ordered();
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terms_with_signs_and_constants() {
        let (terms, constant) = parse_terms("- 2 x + y - 3.5 z + 4", 1).unwrap();
        assert_eq!(
            terms,
            vec![
                ("x".to_string(), -2.0),
                ("y".to_string(), 1.0),
                ("z".to_string(), -3.5)
            ]
        );
        assert_eq!(constant, 4.0);
    }

    #[test]
    fn compact_signs() {
        let (terms, constant) = parse_terms("-x +2 y -1", 1).unwrap();
        assert_eq!(terms, vec![("x".to_string(), -1.0), ("y".to_string(), 2.0)]);
        assert_eq!(constant, -1.0);
    }

    #[test]
    fn relations_are_split() {
        let (operands, operators) = split_relations("-inf <= x <= 3");
        assert_eq!(operands, vec!["-inf", "x", "3"]);
        assert_eq!(operators, vec![Ordering::Less, Ordering::Less]);
        let (operands, operators) = split_relations("x + y =>2");
        assert_eq!(operands, vec!["x + y", "2"]);
        assert_eq!(operators, vec![Ordering::Greater]);
    }

    #[test]
    fn rejects_garbage() {
        let err = parse_lp("Minimize\n obj: x\nSubject To\n c1: x + y\nEnd\n").unwrap_err();
        assert!(matches!(err, NativeError::Parse { line: 4, .. }));
        assert!(parse_lp("x + y >= 2").is_err());
    }
}
