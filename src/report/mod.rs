//! Report export: kinds, ranges and formats gated by plan, rendered from an HTML template.

mod html;

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use chrono::NaiveDate;
use thiserror::Error;

use crate::core::aggregation::Aggregation;
use crate::core::profit_curve::CurvePoint;
use crate::currency::AmountFormatter;
use crate::domain::{Gated, Plan, PlanPolicy};
use crate::errors::PropFlowError;
use crate::utils::paths::{ensure_dir, write_atomic};

pub use html::render_html;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("{feature} requires the {required} plan")]
    Locked {
        feature: &'static str,
        required: Plan,
    },
    #[error("{0}")]
    Unknown(String),
    #[error(transparent)]
    Storage(#[from] PropFlowError),
    #[error("failed to render report: {0}")]
    Render(#[from] askama::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportKind {
    #[default]
    Transactions,
    Summary,
    Performance,
    Detailed,
    Custom,
    AllInOne,
}

impl ReportKind {
    pub const ALL: [ReportKind; 6] = [
        ReportKind::Transactions,
        ReportKind::Summary,
        ReportKind::Performance,
        ReportKind::Detailed,
        ReportKind::Custom,
        ReportKind::AllInOne,
    ];

    pub fn token(self) -> &'static str {
        match self {
            ReportKind::Transactions => "transactions",
            ReportKind::Summary => "summary",
            ReportKind::Performance => "performance",
            ReportKind::Detailed => "detailed",
            ReportKind::Custom => "custom",
            ReportKind::AllInOne => "all-in-one",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Transactions => "Transaction History",
            ReportKind::Summary => "Monthly Summary",
            ReportKind::Performance => "Performance Analysis",
            ReportKind::Detailed => "Detailed Analytics",
            ReportKind::Custom => "Custom",
            ReportKind::AllInOne => "Comprehensive",
        }
    }
}

impl Gated for ReportKind {
    fn required_plan(&self) -> Plan {
        match self {
            ReportKind::Transactions => Plan::Starter,
            ReportKind::Summary | ReportKind::Performance => Plan::Standard,
            ReportKind::Detailed | ReportKind::Custom | ReportKind::AllInOne => Plan::Premium,
        }
    }

    fn feature_label(&self) -> &'static str {
        self.title()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportRange {
    Last7Days,
    #[default]
    Last30Days,
    Last3Months,
    Last6Months,
    LastYear,
    AllTime,
}

impl ReportRange {
    pub const ALL: [ReportRange; 6] = [
        ReportRange::Last7Days,
        ReportRange::Last30Days,
        ReportRange::Last3Months,
        ReportRange::Last6Months,
        ReportRange::LastYear,
        ReportRange::AllTime,
    ];

    pub fn token(self) -> &'static str {
        match self {
            ReportRange::Last7Days => "7d",
            ReportRange::Last30Days => "30d",
            ReportRange::Last3Months => "3m",
            ReportRange::Last6Months => "6m",
            ReportRange::LastYear => "1y",
            ReportRange::AllTime => "all",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReportRange::Last7Days => "Last 7 days",
            ReportRange::Last30Days => "Last 30 days",
            ReportRange::Last3Months => "Last 3 months",
            ReportRange::Last6Months => "Last 6 months",
            ReportRange::LastYear => "Last year",
            ReportRange::AllTime => "All time",
        }
    }

    /// Label for a raw selector; anything unrecognised reads as the 30 day default.
    pub fn label_for(token: &str) -> &'static str {
        token
            .parse::<ReportRange>()
            .unwrap_or_default()
            .label()
    }
}

impl Gated for ReportRange {
    fn required_plan(&self) -> Plan {
        match self {
            ReportRange::Last7Days | ReportRange::Last30Days => Plan::Starter,
            ReportRange::Last3Months | ReportRange::Last6Months => Plan::Standard,
            ReportRange::LastYear | ReportRange::AllTime => Plan::Premium,
        }
    }

    fn feature_label(&self) -> &'static str {
        self.label()
    }
}

/// Requested download format. The file written is always HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Pdf,
    Csv,
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Pdf, ExportFormat::Csv, ExportFormat::Xlsx];

    pub fn token(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Csv => "csv",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ExportFormat::Pdf => "PDF Document",
            ExportFormat::Csv => "CSV Spreadsheet",
            ExportFormat::Xlsx => "Excel Spreadsheet",
        }
    }
}

impl Gated for ExportFormat {
    fn required_plan(&self) -> Plan {
        match self {
            ExportFormat::Pdf => Plan::Starter,
            ExportFormat::Csv => Plan::Standard,
            ExportFormat::Xlsx => Plan::Premium,
        }
    }

    fn feature_label(&self) -> &'static str {
        self.label()
    }
}

macro_rules! token_enum_parse {
    ($ty:ty, $what:literal) => {
        impl FromStr for $ty {
            type Err = ReportError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim().to_ascii_lowercase();
                <$ty>::ALL
                    .into_iter()
                    .find(|item| item.token() == needle)
                    .ok_or_else(|| ReportError::Unknown(format!("Unknown {}: '{}'", $what, s.trim())))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.token())
            }
        }
    };
}

token_enum_parse!(ReportKind, "report type");
token_enum_parse!(ReportRange, "date range");
token_enum_parse!(ExportFormat, "export format");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportRequest {
    pub kind: ReportKind,
    pub range: ReportRange,
    pub format: ExportFormat,
}

impl ReportRequest {
    pub fn new(kind: ReportKind, range: ReportRange, format: ExportFormat) -> Self {
        Self {
            kind,
            range,
            format,
        }
    }

    /// Fails on the first selector the plan does not unlock.
    pub fn validate(&self, plan: Plan) -> Result<(), ReportError> {
        ensure_unlocked(plan, &self.kind)?;
        ensure_unlocked(plan, &self.range)?;
        ensure_unlocked(plan, &self.format)
    }

    pub fn file_name(&self, generated_on: NaiveDate) -> String {
        format!(
            "{}-{}-{}.html",
            self.kind.token(),
            self.range.token(),
            generated_on.format("%Y-%m-%d")
        )
    }
}

fn ensure_unlocked(plan: Plan, feature: &impl Gated) -> Result<(), ReportError> {
    if PlanPolicy::allows(plan, feature) {
        Ok(())
    } else {
        Err(ReportError::Locked {
            feature: feature.feature_label(),
            required: feature.required_plan(),
        })
    }
}

/// Inputs for one rendered report.
pub struct ReportContext<'a> {
    pub plan: Plan,
    pub generated_on: NaiveDate,
    pub aggregation: &'a Aggregation,
    pub curve: &'a [CurvePoint],
    pub formatter: &'a AmountFormatter,
}

pub struct ReportService;

impl ReportService {
    /// Validates, renders and writes the report into `dir`, returning the file path.
    pub fn export(
        request: &ReportRequest,
        context: &ReportContext<'_>,
        dir: &Path,
    ) -> Result<PathBuf, ReportError> {
        request.validate(context.plan)?;
        let document = render_html(request, context)?;
        ensure_dir(dir)?;
        let path = dir.join(request.file_name(context.generated_on));
        write_atomic(&path, &document)?;
        tracing::info!(
            kind = request.kind.token(),
            range = request.range.token(),
            path = %path.display(),
            "report exported"
        );
        Ok(path)
    }
}
