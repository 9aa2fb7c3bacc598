use donation::{
    DependentSelector, FieldPath, FieldRegistry, FormError, FormLayout, ReportMode,
    SelectSource, StalePolicy, Validator, initial_data,
};

use crate::config::{Config, NoticeMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// One-line message shown above the form until dismissed or replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }
}

/// Everything the form shows. Only the app loop mutates it, through
/// [`crate::core::reducer::reduce`].
#[derive(Debug)]
pub struct CheckoutState {
    pub layout: FormLayout,
    pub registry: FieldRegistry,
    pub selector: DependentSelector,
    pub validator: Validator,
    pub network_notices: NoticeMode,
    pub notice: Option<Notice>,
    pub uf_path: FieldPath,
    pub city_path: FieldPath,
    pub quit_requested: bool,
}

impl CheckoutState {
    pub fn from_config(config: &Config) -> Result<Self, FormError> {
        Self::new(
            config.selection.stale_responses,
            config.validation.report,
            config.notices.network_errors,
        )
    }

    pub fn new(
        policy: StalePolicy,
        report: ReportMode,
        network_notices: NoticeMode,
    ) -> Result<Self, FormError> {
        let layout = FormLayout::donation();
        let mut registry = FieldRegistry::with_initial_data(initial_data());
        layout.register_all(&mut registry)?;

        let uf_path = layout
            .select_path(SelectSource::Regions)
            .ok_or_else(|| FormError::UnknownField("region select".into()))?;
        let city_path = layout
            .select_path(SelectSource::Divisions)
            .ok_or_else(|| FormError::UnknownField("division select".into()))?;

        Ok(Self {
            layout,
            registry,
            selector: DependentSelector::new(policy),
            validator: Validator::new(report),
            network_notices,
            notice: None,
            uf_path,
            city_path,
            quit_requested: false,
        })
    }
}
