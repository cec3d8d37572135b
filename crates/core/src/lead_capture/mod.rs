//! Signup capture flow

pub mod service;

pub use service::{
    CapturedLead, EmailDelivery, LeadCaptureOutcome, LeadCaptureRequest, LeadCaptureService,
    TestEmailError, TestEmailSent,
};
