use crate::scalar::{
    checked, stateless_sparql_op, NullarySparqlOp, SparqlOp, StringLiteral, UnarySparqlOp,
};
use rdf_weave_model::{DateTime, DayTimeDuration, Decimal, Integer, ThinResult};

/// `NOW()`. Returns the same value for every call within a query.
#[derive(Debug, Clone, Copy)]
pub struct NowSparqlOp {
    now: DateTime,
}

impl NowSparqlOp {
    pub fn new(now: DateTime) -> Self {
        Self { now }
    }
}

impl SparqlOp for NowSparqlOp {
    fn name(&self) -> &str {
        "NOW"
    }
}

impl NullarySparqlOp for NowSparqlOp {
    type Result = DateTime;

    fn evaluate(&self) -> ThinResult<Self::Result> {
        Ok(self.now)
    }
}

macro_rules! date_time_component_op {
    ($STRUCT: ident, $NAME: expr, $RESULT: ty, $COMPONENT: ident) => {
        stateless_sparql_op!($STRUCT, $NAME);

        impl UnarySparqlOp for $STRUCT {
            type Arg = DateTime;
            type Result = $RESULT;

            fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
                Ok(value.$COMPONENT().into())
            }
        }
    };
}

date_time_component_op!(YearSparqlOp, "YEAR", Integer, year);
date_time_component_op!(MonthSparqlOp, "MONTH", Integer, month);
date_time_component_op!(DaySparqlOp, "DAY", Integer, day);
date_time_component_op!(HoursSparqlOp, "HOURS", Integer, hour);
date_time_component_op!(MinutesSparqlOp, "MINUTES", Integer, minute);
date_time_component_op!(SecondsSparqlOp, "SECONDS", Decimal, second);

stateless_sparql_op!(
    /// Returns the timezone as an `xsd:dayTimeDuration`. Fails if the value has no timezone.
    TimezoneSparqlOp,
    "TIMEZONE"
);

impl UnarySparqlOp for TimezoneSparqlOp {
    type Arg = DateTime;
    type Result = DayTimeDuration;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        checked(value.timezone())
    }
}

stateless_sparql_op!(
    /// Returns the timezone as a simple literal, or the empty string if there is none.
    TzSparqlOp,
    "TZ"
);

impl UnarySparqlOp for TzSparqlOp {
    type Arg = DateTime;
    type Result = StringLiteral;

    fn evaluate(&self, value: Self::Arg) -> ThinResult<Self::Result> {
        let result = value
            .timezone_offset()
            .map(|offset| offset.to_string())
            .unwrap_or_default();
        Ok(StringLiteral::new(result, None))
    }
}
