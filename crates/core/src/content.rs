//! HTML bodies for outbound email
//!
//! `brand_url` is the public site (logo, footer links); `site_url` depends on
//! the environment and is used for download links.

use verdant_domain::constants::DEFAULT_GREETING_NAME;

/// Escape text interpolated into HTML.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Lowercase, whitespace runs replaced by `-`.
pub fn slugify(topic: &str) -> String {
    topic.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

fn greeting_name(first_name: Option<&str>) -> &str {
    first_name.map(str::trim).filter(|name| !name.is_empty()).unwrap_or(DEFAULT_GREETING_NAME)
}

/// Placeholder campaign body used when no content is supplied.
pub fn campaign_placeholder(topic: &str, subject: &str, brand_url: &str) -> String {
    let topic = escape_html(topic);
    let subject = escape_html(subject);
    let topic_lower = topic.to_lowercase();
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <div style="text-align: center; margin-bottom: 30px;">
    <img src="{brand_url}/logo.png" alt="Dr. Sebi Approved" style="max-width: 200px;">
  </div>
  <h2 style="color: #22c55e; text-align: center;">{subject}</h2>
  <p>Dear Friend,</p>
  <p>I wanted to share some important insights about {topic_lower} that could transform your health journey.</p>
  <div style="background: #f0fdf4; padding: 20px; border-radius: 10px; margin: 20px 0;">
    <p>This email was generated as a starting point on {topic}. Please customize this content with specific information about your products and services.</p>
  </div>
  <p>To your health,<br><strong>The Dr. Sebi Approved Team</strong></p>
  <div style="text-align: center; margin-top: 30px;">
    <a href="{brand_url}" style="background: #22c55e; color: white; padding: 15px 30px; text-decoration: none; border-radius: 5px; font-weight: bold;">Visit Our Website</a>
  </div>
</div>"#
    )
}

/// Subject of the lead-magnet welcome email.
pub fn welcome_subject(first_name: Option<&str>) -> String {
    match first_name.map(str::trim).filter(|name| !name.is_empty()) {
        Some(name) => format!("{name}, your Free Gut Health Guide is Here! 🌿"),
        None => "Your Free Gut Health Guide is Here! 🌿".to_string(),
    }
}

/// Body of the lead-magnet welcome email.
pub fn welcome_email(first_name: Option<&str>, site_url: &str, brand_url: &str) -> String {
    let name = escape_html(greeting_name(first_name));
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <div style="text-align: center; margin-bottom: 30px;">
    <img src="{brand_url}/logo.png" alt="Dr. Sebi Approved" style="max-width: 200px;">
  </div>
  <h2 style="color: #22c55e; text-align: center;">Welcome to Your Gut Health Journey! 🌿</h2>
  <p>Hi {name},</p>
  <p>Thank you for downloading our comprehensive gut health guide! You've taken the first step toward reclaiming your digestive wellness using Dr. Sebi's time-tested natural methods.</p>
  <div style="background: #f0fdf4; padding: 20px; border-radius: 10px; margin: 20px 0; text-align: center;">
    <h3 style="color: #15803d; margin-top: 0;">🎯 Your Free Gut Health Guide</h3>
    <p style="margin: 15px 0;">Discover the natural path to remove parasites and restore your digestive health with this comprehensive guide based on Dr. Sebi's proven methods.</p>
    <div style="margin: 20px 0;">
      <a href="{site_url}/download/gut-health-guide" style="display: inline-block; background: #22c55e; color: white; padding: 15px 30px; text-decoration: none; border-radius: 5px; font-weight: bold; margin-bottom: 15px;">📥 Access Your Download Page</a>
      <br>
      <a href="{site_url}/guthealthguide.pdf" style="color: #22c55e; text-decoration: none; font-size: 14px;">Or download PDF directly</a>
    </div>
  </div>
  <p><strong>What's inside your guide:</strong></p>
  <ul style="color: #374151;">
    <li>🔍 Signs you may have parasites (many people don't realize)</li>
    <li>🌱 Dr. Sebi's natural parasite removal protocols</li>
    <li>🍃 Foods that create an inhospitable environment for parasites</li>
    <li>💪 How to rebuild your gut health naturally</li>
    <li>📅 Step-by-step 30-day cleanse protocol</li>
  </ul>
  <p>Over the next few days, I'll be sending you additional insights about gut health and natural wellness. Keep an eye on your inbox!</p>
  <p>To your health,<br><strong>The Dr. Sebi Approved Team</strong></p>
  <hr style="margin: 30px 0; border: none; border-top: 1px solid #e5e7eb;">
  <div style="font-size: 12px; color: #6b7280; text-align: center;">
    <p>You received this email because you requested our gut health guide from drsebiapproved.com</p>
    <p>Dr. Sebi Approved | Natural Wellness Solutions</p>
    <p><a href="{brand_url}" style="color: #22c55e;">Visit Our Website</a></p>
  </div>
</div>"#
    )
}

/// Body of the delivery test email.
pub fn test_email(first_name: &str, timestamp: &str) -> String {
    let name = escape_html(first_name);
    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h2 style="color: #22c55e;">🧪 Test Email Success!</h2>
  <p>Hi {name},</p>
  <p>This is a test email from the Brevo API to verify the email sending functionality is working correctly.</p>
  <div style="background: #f0fdf4; padding: 15px; border-radius: 8px; margin: 20px 0;">
    <h3 style="color: #15803d; margin-top: 0;">✅ API Connection Verified</h3>
    <p style="margin: 0;">Your Brevo integration is working properly!</p>
  </div>
  <p>Timestamp: {timestamp}</p>
  <p>Best regards,<br><strong>Dr. Sebi Approved Team</strong></p>
</div>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_collapses_whitespace() {
        assert_eq!(slugify("Parasite Cleanse  Benefits"), "parasite-cleanse-benefits");
        assert_eq!(slugify("Gut\tHealth"), "gut-health");
    }

    #[test]
    fn welcome_subject_personalizes_when_name_present() {
        assert_eq!(welcome_subject(Some("Ada")), "Ada, your Free Gut Health Guide is Here! 🌿");
        assert_eq!(welcome_subject(Some("  ")), "Your Free Gut Health Guide is Here! 🌿");
        assert_eq!(welcome_subject(None), "Your Free Gut Health Guide is Here! 🌿");
    }

    #[test]
    fn welcome_email_links_to_site_and_escapes_name() {
        let html = welcome_email(Some("<b>Ada</b>"), "http://localhost:3000", "https://drsebiapproved.com");

        assert!(html.contains("Hi &lt;b&gt;Ada&lt;/b&gt;,"));
        assert!(html.contains("http://localhost:3000/download/gut-health-guide"));
        assert!(html.contains("http://localhost:3000/guthealthguide.pdf"));
        assert!(html.contains("https://drsebiapproved.com/logo.png"));
    }

    #[test]
    fn welcome_email_greets_friend_by_default() {
        let html = welcome_email(None, "https://drsebiapproved.com", "https://drsebiapproved.com");
        assert!(html.contains("Hi Friend,"));
    }

    #[test]
    fn campaign_placeholder_is_deterministic() {
        let first = campaign_placeholder("Gut Health", "Spring Reset", "https://drsebiapproved.com");
        let second = campaign_placeholder("Gut Health", "Spring Reset", "https://drsebiapproved.com");

        assert_eq!(first, second);
        assert!(first.contains("insights about gut health"));
        assert!(first.contains(">Spring Reset</h2>"));
    }
}
