//! Outbound email bodies.
//!
//! Each message the product sends is one variant carrying exactly the data
//! its body needs. Rendering is plain string assembly; the HTML alternative
//! uses simple markup so it survives strict mail clients.

use crate::services::currency::format_amount;

/// Aggregates for one account's previous calendar month.
#[derive(Debug, Clone)]
pub struct MonthlySummaryData {
    /// Month name, e.g. "July"
    pub month: String,
    pub year: i32,
    pub currency: String,
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub transaction_count: usize,
    pub highest_expense: f64,
    pub top_category: String,
}

#[derive(Debug, Clone)]
pub enum EmailTemplate {
    Welcome {
        username: String,
    },
    OtpCode {
        username: String,
        code: String,
        ttl_minutes: i64,
    },
    CurrencyUpdate {
        username: String,
        old_currency: String,
        new_currency: String,
        symbol: String,
    },
    TwoFactorEnabled {
        username: String,
    },
    PasswordReset {
        username: String,
    },
    ProfileUpdate {
        username: String,
        updated_fields: Vec<String>,
    },
    MonthlySummary {
        username: String,
        data: MonthlySummaryData,
    },
    SecurityAlert {
        username: String,
        alert_type: String,
        details: String,
    },
}

impl EmailTemplate {
    #[must_use]
    pub fn subject(&self) -> String {
        match self {
            Self::Welcome { .. } => {
                "🎉 Welcome to FinMate - Your Financial Journey Starts Here!".to_string()
            }
            Self::OtpCode { .. } => "🔐 Your FinMate Verification Code".to_string(),
            Self::CurrencyUpdate { new_currency, .. } => {
                format!("💱 Currency Updated - Now using {new_currency}")
            }
            Self::TwoFactorEnabled { .. } => {
                "🔒 Two-Factor Authentication Enabled - Account More Secure!".to_string()
            }
            Self::PasswordReset { .. } => "🔑 Password Reset Successfully".to_string(),
            Self::ProfileUpdate { .. } => "👤 Profile Updated Successfully".to_string(),
            Self::MonthlySummary { data, .. } => {
                format!("📊 Your {} Financial Summary - FinMate", data.month)
            }
            Self::SecurityAlert { alert_type, .. } => {
                format!("🚨 Security Alert - {alert_type}")
            }
        }
    }

    #[must_use]
    pub fn text_body(&self) -> String {
        match self {
            Self::Welcome { username } => format!(
                "Hi {username}!\n\n\
                 Congratulations on taking the first step towards better financial \
                 management! FinMate is here to help you track your expenses, manage \
                 your income, and achieve your financial goals.\n\n\
                 Start exploring your dashboard and take control of your finances today!\n\n\
                 Happy budgeting!\nThe FinMate Team"
            ),
            Self::OtpCode {
                username,
                code,
                ttl_minutes,
            } => format!(
                "Hi {username},\n\n\
                 Your FinMate verification code is: {code}\n\n\
                 The code expires in {ttl_minutes} minutes. If you didn't request it, \
                 you can safely ignore this email."
            ),
            Self::CurrencyUpdate {
                username,
                old_currency,
                new_currency,
                symbol,
            } => format!(
                "Hi {username},\n\n\
                 Your account currency has been successfully updated from \
                 {old_currency} to {new_currency} ({symbol}). All amounts will now \
                 display in {symbol} and new transactions will use {new_currency}.\n\n\
                 If you didn't make this change, please contact our support team \
                 immediately."
            ),
            Self::TwoFactorEnabled { username } => format!(
                "Hi {username},\n\n\
                 Great news! Two-Factor Authentication (2FA) has been successfully \
                 enabled on your FinMate account. Authentication codes are now \
                 required for login.\n\n\
                 Important: keep your backup codes in a safe place. You'll need them \
                 if you lose access to your authenticator app.\n\n\
                 If you didn't enable 2FA, please contact our support team immediately."
            ),
            Self::PasswordReset { username } => format!(
                "Hi {username},\n\n\
                 Your password has been successfully reset. You can now log in to \
                 your FinMate account with your new password.\n\n\
                 If you didn't reset your password, please contact our support team \
                 immediately."
            ),
            Self::ProfileUpdate {
                username,
                updated_fields,
            } => {
                let fields = updated_fields
                    .iter()
                    .map(|f| format!("  - {f}"))
                    .collect::<Vec<_>>()
                    .join("\n");
                format!(
                    "Hi {username},\n\n\
                     Your profile has been successfully updated with the following \
                     changes:\n{fields}\n\n\
                     If you didn't make these changes, please contact our support \
                     team immediately."
                )
            }
            Self::MonthlySummary { username, data } => {
                let verdict = if data.balance >= 0.0 {
                    "🎉 Great job! You saved money this month!"
                } else {
                    "⚠️ You spent more than you earned this month."
                };
                format!(
                    "Hi {username},\n\n\
                     Here's your financial summary for {month} {year}:\n\n\
                     Total Income:   {income}\n\
                     Total Expenses: {expenses}\n\
                     Net Balance:    {balance}\n\
                     {verdict}\n\n\
                     Quick stats:\n\
                     - Number of transactions: {count}\n\
                     - Highest expense: {highest}\n\
                     - Most used category: {category}\n\n\
                     Keep up the great work with FinMate!",
                    month = data.month,
                    year = data.year,
                    income = format_amount(data.total_income, &data.currency),
                    expenses = format_amount(data.total_expenses, &data.currency),
                    balance = format_amount(data.balance, &data.currency),
                    count = data.transaction_count,
                    highest = format_amount(data.highest_expense, &data.currency),
                    category = data.top_category,
                )
            }
            Self::SecurityAlert {
                username,
                alert_type,
                details,
            } => format!(
                "Hi {username},\n\n\
                 {alert_type}\n{details}\n\n\
                 What you should do:\n\
                 1. Review your recent account activity\n\
                 2. Change your password if needed\n\
                 3. Enable 2FA for extra security\n\
                 4. Contact support if you notice anything suspicious"
            ),
        }
    }

    #[must_use]
    pub fn html_body(&self) -> String {
        match self {
            Self::Welcome { username } => format!(
                "<h1>Welcome to FinMate! 🚀</h1>\
                 <p>Hi {username}!</p>\
                 <p>Congratulations on taking the first step towards better financial \
                 management! FinMate is here to help you track your expenses, manage \
                 your income, and achieve your financial goals.</p>\
                 <ul>\
                 <li>📊 Track your income and expenses</li>\
                 <li>📈 Visualize your financial data with charts</li>\
                 <li>💰 Manage multiple currencies</li>\
                 <li>🔒 Secure your account with 2FA</li>\
                 </ul>\
                 <p>Happy budgeting!<br>The FinMate Team</p>"
            ),
            Self::OtpCode {
                username,
                code,
                ttl_minutes,
            } => format!(
                "<h1>Verify your email</h1>\
                 <p>Hi {username},</p>\
                 <p>Your FinMate verification code is:</p>\
                 <p style=\"font-size:28px;letter-spacing:4px\"><strong>{code}</strong></p>\
                 <p>The code expires in {ttl_minutes} minutes. If you didn't request \
                 it, you can safely ignore this email.</p>"
            ),
            Self::CurrencyUpdate {
                username,
                old_currency,
                new_currency,
                symbol,
            } => format!(
                "<h1>Currency Updated Successfully! 💱</h1>\
                 <p>Hi {username},</p>\
                 <p>Your account currency has been successfully updated from \
                 <strong>{old_currency}</strong> to <strong>{new_currency} \
                 ({symbol})</strong>.</p>\
                 <p>If you didn't make this change, please contact our support team \
                 immediately.</p>"
            ),
            Self::TwoFactorEnabled { username } => format!(
                "<h1>🔒 2FA Enabled Successfully!</h1>\
                 <p>Hi {username},</p>\
                 <p>Great news! Two-Factor Authentication (2FA) has been successfully \
                 enabled on your FinMate account.</p>\
                 <p><strong>Important:</strong> keep your backup codes in a safe \
                 place. You'll need them if you lose access to your authenticator \
                 app.</p>\
                 <p>If you didn't enable 2FA, please contact our support team \
                 immediately.</p>"
            ),
            Self::PasswordReset { username } => format!(
                "<h1>🔑 Password Reset Successful</h1>\
                 <p>Hi {username},</p>\
                 <p>Your password has been successfully reset. You can now log in to \
                 your FinMate account with your new password.</p>\
                 <p>If you didn't reset your password, please contact our support \
                 team immediately.</p>"
            ),
            Self::ProfileUpdate {
                username,
                updated_fields,
            } => {
                let fields = updated_fields
                    .iter()
                    .map(|f| format!("<li>{f}</li>"))
                    .collect::<String>();
                format!(
                    "<h1>👤 Profile Updated!</h1>\
                     <p>Hi {username},</p>\
                     <p>Your profile has been successfully updated with the following \
                     changes:</p>\
                     <ul>{fields}</ul>\
                     <p>If you didn't make these changes, please contact our support \
                     team immediately.</p>"
                )
            }
            Self::MonthlySummary { username, data } => {
                let verdict = if data.balance >= 0.0 {
                    "🎉 Great job! You saved money this month!"
                } else {
                    "⚠️ You spent more than you earned this month."
                };
                format!(
                    "<h1>📊 Monthly Financial Summary</h1>\
                     <p>{month} {year}</p>\
                     <p>Hi {username},</p>\
                     <p>Here's your financial summary for {month}:</p>\
                     <ul>\
                     <li>💰 Total Income: <strong>{income}</strong></li>\
                     <li>💸 Total Expenses: <strong>{expenses}</strong></li>\
                     <li>💼 Net Balance: <strong>{balance}</strong></li>\
                     </ul>\
                     <p>{verdict}</p>\
                     <ul>\
                     <li>Number of transactions: {count}</li>\
                     <li>Highest expense: {highest}</li>\
                     <li>Most used category: {category}</li>\
                     </ul>\
                     <p>Keep up the great work with FinMate! 🚀</p>",
                    month = data.month,
                    year = data.year,
                    income = format_amount(data.total_income, &data.currency),
                    expenses = format_amount(data.total_expenses, &data.currency),
                    balance = format_amount(data.balance, &data.currency),
                    count = data.transaction_count,
                    highest = format_amount(data.highest_expense, &data.currency),
                    category = data.top_category,
                )
            }
            Self::SecurityAlert {
                username,
                alert_type,
                details,
            } => format!(
                "<h1>🚨 Security Alert</h1>\
                 <p>Hi {username},</p>\
                 <p><strong>{alert_type}</strong></p>\
                 <p>{details}</p>\
                 <p><strong>What you should do:</strong><br>\
                 1. Review your recent account activity<br>\
                 2. Change your password if needed<br>\
                 3. Enable 2FA for extra security<br>\
                 4. Contact support if you notice anything suspicious</p>"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary_data() -> MonthlySummaryData {
        MonthlySummaryData {
            month: "December".to_string(),
            year: 2024,
            currency: "USD".to_string(),
            total_income: 5000.0,
            total_expenses: 3500.0,
            balance: 1500.0,
            transaction_count: 25,
            highest_expense: 500.0,
            top_category: "Food".to_string(),
        }
    }

    #[test]
    fn subjects_carry_dynamic_parts() {
        let currency = EmailTemplate::CurrencyUpdate {
            username: "sam".into(),
            old_currency: "USD".into(),
            new_currency: "EUR".into(),
            symbol: "€".into(),
        };
        assert_eq!(currency.subject(), "💱 Currency Updated - Now using EUR");

        let summary = EmailTemplate::MonthlySummary {
            username: "sam".into(),
            data: summary_data(),
        };
        assert_eq!(
            summary.subject(),
            "📊 Your December Financial Summary - FinMate"
        );
    }

    #[test]
    fn otp_body_contains_code_and_ttl() {
        let tpl = EmailTemplate::OtpCode {
            username: "sam".into(),
            code: "123456".into(),
            ttl_minutes: 5,
        };
        assert!(tpl.text_body().contains("123456"));
        assert!(tpl.text_body().contains("5 minutes"));
        assert!(tpl.html_body().contains("<strong>123456</strong>"));
    }

    #[test]
    fn summary_renders_formatted_amounts() {
        let tpl = EmailTemplate::MonthlySummary {
            username: "sam".into(),
            data: summary_data(),
        };
        let text = tpl.text_body();
        assert!(text.contains("$5,000"));
        assert!(text.contains("$3,500"));
        assert!(text.contains("$1,500"));
        assert!(text.contains("Great job"));
    }

    #[test]
    fn negative_balance_changes_the_verdict() {
        let mut data = summary_data();
        data.balance = -200.0;
        let tpl = EmailTemplate::MonthlySummary {
            username: "sam".into(),
            data,
        };
        assert!(tpl.text_body().contains("spent more than you earned"));
    }

    #[test]
    fn profile_update_lists_fields() {
        let tpl = EmailTemplate::ProfileUpdate {
            username: "sam".into(),
            updated_fields: vec!["Username".into(), "Email Address".into()],
        };
        let html = tpl.html_body();
        assert!(html.contains("<li>Username</li>"));
        assert!(html.contains("<li>Email Address</li>"));
    }
}
