use crate::error::Error;
use serde::Serialize;
use std::str::FromStr;

const SCHEME: &str = "aws://";

/// Deployment target of a stack, as written in the cloud assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct Environment {
    pub(crate) account: String,
    pub(crate) region: String,
    pub(crate) name: String,
}

#[cfg(test)]
impl Environment {
    pub(crate) fn new(account: impl Into<String>, region: impl Into<String>) -> Self {
        let account = account.into();
        let region = region.into();
        let name = format!("{}{}/{}", SCHEME, account, region);
        Self {
            account,
            region,
            name,
        }
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(SCHEME)
            .ok_or_else(|| Error::InvalidEnvironment(s.to_string()))?;

        let mut parts = rest.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(account), Some(region), None) if !account.is_empty() && !region.is_empty() => {
                Ok(Self {
                    account: account.to_string(),
                    region: region.to_string(),
                    name: s.to_string(),
                })
            }
            _ => Err(Error::InvalidEnvironment(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_account_and_region() {
        let env: Environment = "aws://123456789012/bermuda-triangle-1".parse().unwrap();
        assert_eq!(env, Environment::new("123456789012", "bermuda-triangle-1"));
        assert_eq!(env.name, "aws://123456789012/bermuda-triangle-1");
    }

    #[test]
    fn accepts_unknown_placeholders() {
        let env: Environment = "aws://unknown-account/unknown-region".parse().unwrap();
        assert_eq!(env.account, "unknown-account");
        assert_eq!(env.region, "unknown-region");
    }

    #[test]
    fn rejects_malformed_strings() {
        for bad in &[
            "123456789012/us-east-1",
            "aws://123456789012",
            "aws://123456789012/",
            "aws:///us-east-1",
            "aws://1/us-east-1/extra",
        ] {
            match bad.parse::<Environment>() {
                Err(Error::InvalidEnvironment(s)) => assert_eq!(&s, bad),
                other => panic!("expected invalid environment for {}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn serializes_in_declaration_order() {
        let env = Environment::new("123456789012", "bermuda-triangle-1");
        assert_eq!(
            serde_json::to_string(&env).unwrap(),
            r#"{"account":"123456789012","region":"bermuda-triangle-1","name":"aws://123456789012/bermuda-triangle-1"}"#
        );
    }
}
