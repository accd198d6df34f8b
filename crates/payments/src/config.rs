/// Card rail credentials
#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    /// e.g. `"https://api.stripe.com"`
    pub api_base: String,
}

/// Wallet rail credentials
#[derive(Debug, Clone)]
pub struct PaypalConfig {
    pub client_id: String,
    pub secret_id: String,
    /// e.g. `"https://api-m.sandbox.paypal.com"`
    pub api_base: String,
}

/// Settings the payment bridge is constructed with
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    /// Frontend base URL that checkout redirects back to
    pub site_url: String,
    /// ISO currency code charged by the card rail, lowercase
    pub currency: String,
    pub stripe: StripeConfig,
    pub paypal: PaypalConfig,
}

impl PaymentConfig {
    /// Where the processor sends the buyer after paying; the processor
    /// substitutes `{CHECKOUT_SESSION_ID}`
    pub fn success_url(&self, oid: &str) -> String {
        format!(
            "{}/payment-success/{oid}?session_id={{CHECKOUT_SESSION_ID}}",
            self.site_url.trim_end_matches('/')
        )
    }

    pub fn cancel_url(&self, oid: &str) -> String {
        format!("{}/payment-failed/{oid}", self.site_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(site_url: &str) -> PaymentConfig {
        PaymentConfig {
            site_url: site_url.to_string(),
            currency: "usd".to_string(),
            stripe: StripeConfig {
                secret_key: "sk_test".to_string(),
                api_base: "https://api.stripe.com".to_string(),
            },
            paypal: PaypalConfig {
                client_id: "id".to_string(),
                secret_id: "secret".to_string(),
                api_base: "https://api-m.sandbox.paypal.com".to_string(),
            },
        }
    }

    #[test]
    fn test_redirect_urls() {
        let config = config("https://learn.example.com/");

        assert_eq!(
            config.success_url("DABC"),
            "https://learn.example.com/payment-success/DABC?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(
            config.cancel_url("DABC"),
            "https://learn.example.com/payment-failed/DABC"
        );
    }
}
