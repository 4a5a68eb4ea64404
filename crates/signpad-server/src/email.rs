//! Delivery notification payloads and email templates.

use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// AI pallet-count analysis attached to a delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysisSummary {
    /// Confidence in `0.0..=1.0`.
    pub confidence: f64,
    pub reasoning: String,
}

/// A confirmed delivery, as posted by the driver form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryNotification {
    pub delivery_id: String,
    pub driver_name: String,
    pub driver_phone: String,
    pub driver_email: String,
    pub company_name: String,
    pub pickup_location: String,
    pub delivery_location: String,
    pub pallet_count: u32,
    pub confirmed_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bill_of_lading_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<AiAnalysisSummary>,
}

/// A rendered email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub subject: String,
    pub text: String,
    pub html: String,
}

impl EmailMessage {
    /// Render the notification email for a delivery.
    pub fn for_delivery(data: &DeliveryNotification) -> Self {
        Self {
            subject: subject(data),
            text: text_body(data),
            html: html_body(data),
        }
    }
}

const FOOTER: &str = "This is an automated notification from the Pallet Tracking System";

fn subject(data: &DeliveryNotification) -> String {
    format!("New Pallet Delivery Confirmed - {} Pallets", data.pallet_count)
}

fn confidence_percent(analysis: &AiAnalysisSummary) -> i64 {
    (analysis.confidence.clamp(0.0, 1.0) * 100.0).round() as i64
}

fn text_body(data: &DeliveryNotification) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = write!(
        out,
        "PALLET DELIVERY CONFIRMED\n\n\
         Delivery Summary:\n\
         - Pallets Confirmed: {}\n\
         - Confirmed At: {}\n\
         - Status: Confirmed\n\n\
         Driver Information:\n\
         - Name: {}\n\
         - Phone: {}\n\
         - Email: {}\n\
         - Company: {}\n\n\
         Delivery Details:\n\
         - Pickup Location: {}\n\
         - Delivery Location: {}\n",
        data.pallet_count,
        data.confirmed_at,
        data.driver_name,
        data.driver_phone,
        data.driver_email,
        data.company_name,
        data.pickup_location,
        data.delivery_location,
    );

    if let Some(analysis) = &data.ai_analysis {
        let _ = write!(
            out,
            "\nAI Analysis:\n- Confidence: {}%\n- Analysis: {}\n",
            confidence_percent(analysis),
            analysis.reasoning
        );
    }

    out.push_str("\nDocumentation:\n");
    if let Some(url) = &data.bill_of_lading_url {
        let _ = writeln!(out, "- Bill of Lading: {}", url);
    }
    if let Some(url) = &data.signature_url {
        let _ = writeln!(out, "- Digital Signature: {}", url);
    }

    let _ = write!(out, "\n---\n{}\nDelivery ID: {}", FOOTER, data.delivery_id);
    out
}

fn html_body(data: &DeliveryNotification) -> String {
    let mut out = String::from(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>Pallet Delivery Confirmation</title>\n\
         <style>\n\
         body { font-family: Arial, sans-serif; line-height: 1.6; color: #333; }\n\
         .container { max-width: 600px; margin: 0 auto; padding: 20px; }\n\
         .header { background: #2563eb; color: white; padding: 20px; text-align: center; }\n\
         .content { padding: 20px; background: #f9fafb; }\n\
         .section { margin-bottom: 20px; }\n\
         .label { font-weight: bold; color: #374151; }\n\
         .value { margin-left: 10px; }\n\
         .pallet-count { font-size: 24px; font-weight: bold; color: #2563eb; }\n\
         .footer { text-align: center; padding: 20px; color: #6b7280; font-size: 14px; }\n\
         </style>\n</head>\n<body>\n<div class=\"container\">\n\
         <div class=\"header\"><h1>Pallet Delivery Confirmed</h1></div>\n\
         <div class=\"content\">\n",
    );

    let _ = write!(
        out,
        "<div class=\"section\">\n<h2>Delivery Summary</h2>\n\
         {}\n{}\n{}\n</div>\n",
        html_field_with_class("Pallets Confirmed", &data.pallet_count.to_string(), "pallet-count"),
        html_field("Confirmed At", &data.confirmed_at),
        html_field("Status", "Confirmed"),
    );

    let _ = write!(
        out,
        "<div class=\"section\">\n<h3>Driver Information</h3>\n{}\n{}\n{}\n{}\n</div>\n",
        html_field("Name", &data.driver_name),
        html_field("Phone", &data.driver_phone),
        html_field("Email", &data.driver_email),
        html_field("Company", &data.company_name),
    );

    let _ = write!(
        out,
        "<div class=\"section\">\n<h3>Delivery Details</h3>\n\
         <p><span class=\"label\">Pickup Location:</span></p>\n\
         <p style=\"margin-left: 20px; color: #6b7280;\">{}</p>\n\
         <p><span class=\"label\">Delivery Location:</span></p>\n\
         <p style=\"margin-left: 20px; color: #6b7280;\">{}</p>\n</div>\n",
        escape_html(&data.pickup_location),
        escape_html(&data.delivery_location),
    );

    if let Some(analysis) = &data.ai_analysis {
        let _ = write!(
            out,
            "<div class=\"section\">\n<h3>AI Analysis</h3>\n{}\n{}\n</div>\n",
            html_field("Confidence", &format!("{}%", confidence_percent(analysis))),
            html_field("Analysis", &analysis.reasoning),
        );
    }

    out.push_str("<div class=\"section\">\n<h3>Documentation</h3>\n");
    if let Some(url) = &data.bill_of_lading_url {
        let _ = writeln!(
            out,
            "<p><a href=\"{}\">View Bill of Lading</a></p>",
            escape_html(url)
        );
    }
    if let Some(url) = &data.signature_url {
        let _ = writeln!(
            out,
            "<p><a href=\"{}\">View Digital Signature</a></p>",
            escape_html(url)
        );
    }
    out.push_str("</div>\n</div>\n");

    let _ = write!(
        out,
        "<div class=\"footer\">\n<p>{}</p>\n<p>Delivery ID: {}</p>\n</div>\n\
         </div>\n</body>\n</html>\n",
        FOOTER,
        escape_html(&data.delivery_id),
    );
    out
}

fn html_field(label: &str, value: &str) -> String {
    html_field_with_class(label, value, "value")
}

fn html_field_with_class(label: &str, value: &str, class: &str) -> String {
    format!(
        "<p><span class=\"label\">{}:</span> <span class=\"{}\">{}</span></p>",
        label,
        class,
        escape_html(value)
    )
}

/// Escape text for HTML element content and quoted attributes.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
