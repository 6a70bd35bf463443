use crate::{Error, Result};
use qrcode::{render::svg, QrCode};
use tracing::error;
use url::Url;

pub const UPI_CURRENCY: &str = "INR";

/// donation form payment modes, distinct from the free-form
/// methods stored on records
pub const METHOD_DIGITAL: &str = "digital";
pub const METHOD_CASH: &str = "cash";

/// the raw form value must parse as a positive number before any
/// qr generation is attempted
pub fn eligible_amount(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|a| a.is_finite() && *a > 0.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpiIntent {
    pub vpa: String,
    pub payee_name: String,
    pub amount: f64,
    pub note: String,
}

impl UpiIntent {
    pub fn deep_link(&self) -> Result<Url> {
        let mut url = Url::parse("upi://pay")?;
        url.query_pairs_mut()
            .append_pair("pa", &self.vpa)
            .append_pair("pn", &self.payee_name)
            .append_pair("am", &format!("{}", self.amount))
            .append_pair("cu", UPI_CURRENCY)
            .append_pair("tn", &self.note);
        Ok(url)
    }

    /// svg document encoding the deep link
    pub fn qr_svg(&self) -> Result<String> {
        let link = self.deep_link()?;
        let code = QrCode::new(link.as_str())
            .map_err(|e| Error::Message(format!("qr encode failed: {}", e)))?;
        Ok(code.render::<svg::Color>().min_dimensions(240, 240).build())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum QrState {
    /// amount or method not eligible
    #[default]
    Idle,
    /// eligible input, no image yet
    Pending,
    /// rendered svg
    Ready(String),
}

/// mirrors the donation form: the qr follows every amount or method
/// edit, ineligible input clears it
#[derive(Debug, Clone)]
pub struct DonationDraft {
    vpa: String,
    payee_name: String,
    amount: String,
    method: String,
    state: QrState,
}

impl DonationDraft {
    pub fn new(vpa: impl Into<String>, payee_name: impl Into<String>) -> Self {
        Self {
            vpa: vpa.into(),
            payee_name: payee_name.into(),
            amount: String::new(),
            method: METHOD_CASH.to_owned(),
            state: QrState::Idle,
        }
    }

    pub fn set_amount(&mut self, amount: &str) {
        self.amount = amount.to_owned();
        self.refresh();
    }

    pub fn set_method(&mut self, method: &str) {
        self.method = method.to_owned();
        self.refresh();
    }

    pub fn state(&self) -> &QrState {
        &self.state
    }

    pub fn qr_svg(&self) -> Option<&str> {
        match &self.state {
            QrState::Ready(svg) => Some(svg),
            _ => None,
        }
    }

    fn refresh(&mut self) {
        let amount = match eligible_amount(&self.amount) {
            Some(amount) if self.method == METHOD_DIGITAL => amount,
            _ => {
                self.state = QrState::Idle;
                return;
            }
        };
        // a failed render keeps the previous image on screen
        let previous = std::mem::replace(&mut self.state, QrState::Pending);
        let intent = UpiIntent {
            vpa: self.vpa.clone(),
            payee_name: self.payee_name.clone(),
            amount,
            note: format!("Donation to {}", self.payee_name),
        };
        match intent.qr_svg() {
            Ok(svg) => self.state = QrState::Ready(svg),
            Err(e) => {
                error!(error = e.to_string(), "failed to render donation qr");
                if let QrState::Ready(svg) = previous {
                    self.state = QrState::Ready(svg);
                }
            }
        }
    }
}
