use itertools::Either;
use rdf_weave_model::{Term, Variable};
use rustc_hash::{FxHashMap, FxHashSet};
use std::iter;

/// The values of a solution, aligned with the variables of its [Bindings]. `None` is unbound.
pub type Row = Vec<Option<Term>>;

/// A handle of a row within a single [Bindings].
///
/// Handles are positions in the row arena of their multiset. They are not meaningful for any
/// other multiset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(usize);

impl RowId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A read-only view of a single solution.
#[derive(Debug, Clone, Copy)]
pub struct BindingSet<'a> {
    id: RowId,
    variables: &'a [Variable],
    values: &'a [Option<Term>],
}

impl<'a> BindingSet<'a> {
    pub fn id(&self) -> RowId {
        self.id
    }

    /// Returns the value of `variable`, or `None` if it is unbound or unknown.
    pub fn get(&self, variable: &Variable) -> Option<&'a Term> {
        self.variables
            .iter()
            .position(|v| v == variable)
            .and_then(|index| self.values[index].as_ref())
    }

    pub fn values(&self) -> &'a [Option<Term>] {
        self.values
    }

    /// Iterates over the bound variables.
    pub fn iter(&self) -> impl Iterator<Item = (&'a Variable, &'a Term)> + 'a {
        self.variables
            .iter()
            .zip(self.values)
            .filter_map(|(variable, value)| value.as_ref().map(|value| (variable, value)))
    }
}

/// A list of solutions that share the same variables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    variables: Vec<Variable>,
    rows: Vec<Row>,
}

impl Bindings {
    /// Creates a [Bindings] without rows.
    pub fn new(variables: Vec<Variable>) -> Self {
        Self {
            variables,
            rows: Vec::new(),
        }
    }

    /// Creates a [Bindings] from `rows`. Each row is padded or cut to the number of variables.
    pub fn with_rows(variables: Vec<Variable>, rows: impl IntoIterator<Item = Row>) -> Self {
        let mut result = Self::new(variables);
        for row in rows {
            result.push(row);
        }
        result
    }

    /// A single solution without variables.
    fn identity() -> Self {
        Self {
            variables: Vec::new(),
            rows: vec![Vec::new()],
        }
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row and returns its handle.
    pub fn push(&mut self, mut row: Row) -> RowId {
        row.resize(self.variables.len(), None);
        self.rows.push(row);
        RowId(self.rows.len() - 1)
    }

    pub fn row(&self, id: RowId) -> Option<BindingSet<'_>> {
        self.rows.get(id.0).map(|values| BindingSet {
            id,
            variables: &self.variables,
            values,
        })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = BindingSet<'_>> {
        self.rows
            .iter()
            .enumerate()
            .map(|(index, values)| BindingSet {
                id: RowId(index),
                variables: &self.variables,
                values,
            })
    }

    pub(crate) fn index_of(&self, variable: &Variable) -> Option<usize> {
        self.variables.iter().position(|v| v == variable)
    }

    fn truncate(&mut self, length: usize) {
        self.rows.truncate(length);
    }
}

/// A multiset of solutions, the value that flows between the operators of the algebra.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Multiset {
    /// No solutions and no variables.
    #[default]
    Empty,
    /// A single solution without variables. The neutral element of [Multiset::join].
    Identity,
    /// No solutions because a pattern cannot match at all, e.g., a path between two unconnected
    /// terms or a graph that is not part of the dataset. Absorbs joins like [Multiset::Empty].
    Null,
    /// Solutions over a declared list of variables.
    Bindings(Bindings),
}

impl From<Bindings> for Multiset {
    fn from(value: Bindings) -> Self {
        Multiset::Bindings(value)
    }
}

impl Multiset {
    pub fn variables(&self) -> &[Variable] {
        match self {
            Multiset::Bindings(bindings) => bindings.variables(),
            Multiset::Empty | Multiset::Identity | Multiset::Null => &[],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Multiset::Empty | Multiset::Null => 0,
            Multiset::Identity => 1,
            Multiset::Bindings(bindings) => bindings.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = BindingSet<'_>> {
        match self {
            Multiset::Bindings(bindings) => Either::Left(bindings.iter()),
            Multiset::Identity => Either::Right(Either::Left(iter::once(BindingSet {
                id: RowId(0),
                variables: &[],
                values: &[],
            }))),
            Multiset::Empty | Multiset::Null => Either::Right(Either::Right(iter::empty())),
        }
    }

    /// Turns the multiset into rows over explicit variables.
    pub fn into_bindings(self) -> Bindings {
        match self {
            Multiset::Bindings(bindings) => bindings,
            Multiset::Identity => Bindings::identity(),
            Multiset::Empty | Multiset::Null => Bindings::default(),
        }
    }

    fn is_absorbing(&self) -> bool {
        matches!(self, Multiset::Empty | Multiset::Null)
    }

    /// The natural join of both multisets.
    ///
    /// Two solutions are compatible if every shared variable is either unbound in one of them or
    /// bound to the same term in both. Solutions are produced in the order of `self`.
    pub fn join(self, rhs: Multiset) -> Multiset {
        match (self, rhs) {
            (Multiset::Empty, _) | (_, Multiset::Empty) => Multiset::Empty,
            (Multiset::Null, _) | (_, Multiset::Null) => Multiset::Null,
            (Multiset::Identity, other) | (other, Multiset::Identity) => other,
            (Multiset::Bindings(lhs), Multiset::Bindings(rhs)) => {
                let index = JoinIndex::new(lhs.variables(), &rhs);
                let mut result = Bindings::new(join_variables(lhs.variables(), rhs.variables()));
                for lhs_row in lhs.rows() {
                    for candidate in index.candidates(lhs_row) {
                        result.push(index.merge(lhs_row, &rhs.rows[candidate]));
                    }
                }
                result.into()
            }
        }
    }

    /// Joins both multisets and only keeps the joined rows for which `filter` holds.
    ///
    /// Rows are checked while they are generated, so the unfiltered join is never materialized.
    /// `filter` receives rows aligned with [join_variables].
    pub fn join_filtered(self, rhs: Multiset, filter: &dyn Fn(&[Option<Term>]) -> bool) -> Multiset {
        if self.is_absorbing() || rhs.is_absorbing() {
            return self.join(rhs);
        }

        let lhs = self.into_bindings();
        let rhs = rhs.into_bindings();
        let index = JoinIndex::new(lhs.variables(), &rhs);
        let mut result = Bindings::new(join_variables(lhs.variables(), rhs.variables()));
        for lhs_row in lhs.rows() {
            for candidate in index.candidates(lhs_row) {
                let merged = index.merge(lhs_row, &rhs.rows[candidate]);
                if filter(&merged) {
                    result.push(merged);
                }
            }
        }
        result.into()
    }

    /// The SPARQL OPTIONAL.
    ///
    /// Every solution of `self` is joined with the compatible solutions of `rhs` for which
    /// `filter` holds. Solutions without such a partner are kept as they are. `filter` receives
    /// the merged row, aligned with [join_variables].
    pub fn left_join(
        self,
        rhs: Multiset,
        filter: Option<&dyn Fn(&[Option<Term>]) -> bool>,
    ) -> Multiset {
        if self.is_absorbing() || rhs.is_absorbing() || matches!(rhs, Multiset::Identity) {
            return self;
        }

        let lhs = self.into_bindings();
        let rhs = rhs.into_bindings();
        let index = JoinIndex::new(lhs.variables(), &rhs);
        let mut result = Bindings::new(join_variables(lhs.variables(), rhs.variables()));
        for lhs_row in lhs.rows() {
            let mut matched = false;
            for candidate in index.candidates(lhs_row) {
                let merged = index.merge(lhs_row, &rhs.rows[candidate]);
                if filter.map_or(true, |filter| filter(&merged)) {
                    result.push(merged);
                    matched = true;
                }
            }
            if !matched {
                result.push(lhs_row.clone());
            }
        }
        result.into()
    }

    /// Concatenates both multisets. Variables missing on one side are unbound.
    pub fn union(self, rhs: Multiset) -> Multiset {
        match (self, rhs) {
            (Multiset::Empty | Multiset::Null, other) | (other, Multiset::Empty | Multiset::Null) => {
                other
            }
            (lhs, rhs) => {
                let lhs = lhs.into_bindings();
                let rhs = rhs.into_bindings();
                let variables = join_variables(lhs.variables(), rhs.variables());
                let positions = rhs
                    .variables()
                    .iter()
                    .map(|variable| variables.iter().position(|v| v == variable))
                    .collect::<Vec<_>>();

                let mut result = Bindings::new(variables);
                for row in lhs.into_rows() {
                    result.push(row);
                }
                for row in rhs.into_rows() {
                    let mut target = vec![None; result.variables.len()];
                    for (value, position) in row.into_iter().zip(&positions) {
                        if let Some(position) = position {
                            target[*position] = value;
                        }
                    }
                    result.push(target);
                }
                result.into()
            }
        }
    }

    /// The SPARQL MINUS.
    ///
    /// A solution of `self` is removed if `rhs` contains a compatible solution that shares at
    /// least one bound variable with it. Hence, if both multisets have no variable in common,
    /// nothing is removed.
    pub fn minus(self, rhs: Multiset) -> Multiset {
        if self.is_absorbing() || !matches!(rhs, Multiset::Bindings(_)) {
            return self;
        }

        let lhs = self.into_bindings();
        let rhs = rhs.into_bindings();
        let index = JoinIndex::new(lhs.variables(), &rhs);
        if index.shared.is_empty() {
            return lhs.into();
        }

        let variables = lhs.variables.clone();
        let rows = lhs.into_rows().into_iter().filter(|lhs_row| {
            !index.candidates(lhs_row).into_iter().any(|candidate| {
                let rhs_row = &rhs.rows[candidate];
                index
                    .shared
                    .iter()
                    .any(|(l, r)| lhs_row[*l].is_some() && rhs_row[*r].is_some())
            })
        });
        Bindings::with_rows(variables, rows.collect::<Vec<_>>()).into()
    }

    /// The cross product of both multisets.
    ///
    /// If the multisets share variables, this is the same as [Multiset::join].
    pub fn product(self, rhs: Multiset) -> Multiset {
        let disjoint = self
            .variables()
            .iter()
            .all(|variable| !rhs.variables().contains(variable));
        if !disjoint {
            return self.join(rhs);
        }

        match (self, rhs) {
            (Multiset::Bindings(lhs), Multiset::Bindings(rhs)) => {
                let mut result = Bindings::new(join_variables(lhs.variables(), rhs.variables()));
                for lhs_row in lhs.rows() {
                    for rhs_row in rhs.rows() {
                        let mut row = lhs_row.clone();
                        row.extend(rhs_row.iter().cloned());
                        result.push(row);
                    }
                }
                result.into()
            }
            (lhs, rhs) => lhs.join(rhs),
        }
    }

    /// Binds `variable` to the result of `f` for every solution. If `f` returns `None`, the
    /// variable is unbound in that solution. An existing binding is overwritten.
    pub fn extend(
        self,
        variable: &Variable,
        mut f: impl FnMut(BindingSet<'_>) -> Option<Term>,
    ) -> Multiset {
        if self.is_absorbing() {
            return self;
        }

        let mut bindings = self.into_bindings();
        let values = bindings.iter().map(&mut f).collect::<Vec<_>>();
        let index = match bindings.index_of(variable) {
            Some(index) => index,
            None => {
                bindings.variables.push(variable.clone());
                for row in &mut bindings.rows {
                    row.push(None);
                }
                bindings.variables.len() - 1
            }
        };
        for (row, value) in bindings.rows.iter_mut().zip(values) {
            row[index] = value;
        }
        bindings.into()
    }

    /// Keeps the solutions for which `predicate` holds.
    pub fn filter(self, mut predicate: impl FnMut(BindingSet<'_>) -> bool) -> Multiset {
        match self {
            Multiset::Identity => {
                if predicate(BindingSet {
                    id: RowId(0),
                    variables: &[],
                    values: &[],
                }) {
                    Multiset::Identity
                } else {
                    Multiset::Empty
                }
            }
            Multiset::Bindings(bindings) => {
                let keep = bindings.iter().map(&mut predicate).collect::<Vec<_>>();
                let variables = bindings.variables.clone();
                let rows = bindings
                    .into_rows()
                    .into_iter()
                    .zip(keep)
                    .filter_map(|(row, keep)| keep.then_some(row));
                Bindings::with_rows(variables, rows.collect::<Vec<_>>()).into()
            }
            absorbing => absorbing,
        }
    }

    /// Projects the solutions onto `variables`. Unknown variables are unbound.
    pub fn project(self, variables: &[Variable]) -> Multiset {
        if self.is_absorbing() {
            return self;
        }

        let bindings = self.into_bindings();
        let positions = variables
            .iter()
            .map(|variable| bindings.index_of(variable))
            .collect::<Vec<_>>();
        let rows = bindings.into_rows().into_iter().map(|row| {
            positions
                .iter()
                .map(|position| position.and_then(|position| row[position].clone()))
                .collect::<Row>()
        });
        Bindings::with_rows(variables.to_vec(), rows.collect::<Vec<_>>()).into()
    }

    /// Removes duplicate solutions, keeping the first occurrence.
    pub fn distinct(self) -> Multiset {
        match self {
            Multiset::Bindings(bindings) => {
                let variables = bindings.variables.clone();
                let mut seen = FxHashSet::default();
                let rows = bindings
                    .into_rows()
                    .into_iter()
                    .filter(|row| seen.insert(row.clone()));
                Bindings::with_rows(variables, rows.collect::<Vec<_>>()).into()
            }
            other => other,
        }
    }

    /// Skips `start` solutions and keeps at most `length` of the rest.
    pub fn slice(self, start: usize, length: Option<usize>) -> Multiset {
        match self {
            Multiset::Bindings(mut bindings) => {
                let start = start.min(bindings.len());
                bindings.rows.drain(..start);
                if let Some(length) = length {
                    bindings.truncate(length);
                }
                bindings.into()
            }
            Multiset::Identity if start > 0 || length == Some(0) => Multiset::Empty,
            other => other,
        }
    }

    /// Keeps at most `limit` solutions.
    pub fn limit(self, limit: usize) -> Multiset {
        self.slice(0, Some(limit))
    }
}

/// The variables of a join result: the variables of `lhs` followed by the new variables of
/// `rhs`.
pub fn join_variables(lhs: &[Variable], rhs: &[Variable]) -> Vec<Variable> {
    let mut variables = lhs.to_vec();
    for variable in rhs {
        if !lhs.contains(variable) {
            variables.push(variable.clone());
        }
    }
    variables
}

/// A hash index over the right-hand side of a join.
///
/// Rows whose shared variables are all bound are hashed on these values. Rows with an unbound
/// shared variable are compatible with many keys and are checked one by one.
struct JoinIndex<'a> {
    /// Pairs of (lhs position, rhs position) of the shared variables.
    shared: Vec<(usize, usize)>,
    /// Positions of the rhs variables that are not in the lhs.
    rhs_only: Vec<usize>,
    table: FxHashMap<Vec<&'a Term>, Vec<usize>>,
    partial: Vec<usize>,
    rows: &'a [Row],
}

impl<'a> JoinIndex<'a> {
    fn new(lhs_variables: &[Variable], rhs: &'a Bindings) -> Self {
        let shared = lhs_variables
            .iter()
            .enumerate()
            .filter_map(|(l, variable)| rhs.index_of(variable).map(|r| (l, r)))
            .collect::<Vec<_>>();
        let rhs_only = (0..rhs.variables().len())
            .filter(|r| !shared.iter().any(|(_, shared)| shared == r))
            .collect();

        let mut table = FxHashMap::<_, Vec<usize>>::default();
        let mut partial = Vec::new();
        if !shared.is_empty() {
            for (index, row) in rhs.rows().iter().enumerate() {
                let key = shared
                    .iter()
                    .map(|(_, r)| row[*r].as_ref())
                    .collect::<Option<Vec<_>>>();
                match key {
                    Some(key) => table.entry(key).or_default().push(index),
                    None => partial.push(index),
                }
            }
        }

        Self {
            shared,
            rhs_only,
            table,
            partial,
            rows: rhs.rows(),
        }
    }

    /// Returns the positions of the rhs rows that are compatible with `lhs_row` in rhs order.
    fn candidates(&self, lhs_row: &[Option<Term>]) -> Vec<usize> {
        if self.shared.is_empty() {
            return (0..self.rows.len()).collect();
        }

        let key = self
            .shared
            .iter()
            .map(|(l, _)| lhs_row[*l].as_ref())
            .collect::<Option<Vec<_>>>();
        let mut result = match key {
            Some(key) => {
                let mut result = self.table.get(&key).cloned().unwrap_or_default();
                result.extend(
                    self.partial
                        .iter()
                        .copied()
                        .filter(|index| self.is_compatible(lhs_row, &self.rows[*index])),
                );
                result
            }
            None => (0..self.rows.len())
                .filter(|index| self.is_compatible(lhs_row, &self.rows[*index]))
                .collect(),
        };
        result.sort_unstable();
        result
    }

    fn is_compatible(&self, lhs_row: &[Option<Term>], rhs_row: &[Option<Term>]) -> bool {
        self.shared
            .iter()
            .all(|(l, r)| match (&lhs_row[*l], &rhs_row[*r]) {
                (Some(lhs), Some(rhs)) => lhs == rhs,
                _ => true,
            })
    }

    /// Merges two compatible rows into a row aligned with [join_variables].
    fn merge(&self, lhs_row: &[Option<Term>], rhs_row: &[Option<Term>]) -> Row {
        let mut row = lhs_row.to_vec();
        for (l, r) in &self.shared {
            if row[*l].is_none() {
                row[*l].clone_from(&rhs_row[*r]);
            }
        }
        row.extend(self.rhs_only.iter().map(|r| rhs_row[*r].clone()));
        row
    }
}
