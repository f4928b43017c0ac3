use crate::cli::credential;
use crate::cli::CliContext;
use crate::core::generator::{self, GenerationPolicy};
use crate::core::store::CredentialStore;
use crate::models::identity::Identity;
use anyhow::{Context, Result};
use clap::Args;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Password length (8-128; default from forge.toml)
    #[arg(long)]
    pub length: Option<usize>,

    /// Include lowercase letters (a-z)
    #[arg(long)]
    pub lowercase: bool,

    /// Include uppercase letters (A-Z)
    #[arg(long)]
    pub uppercase: bool,

    /// Include digits (0-9)
    #[arg(long)]
    pub digits: bool,

    /// Include special characters (punctuation)
    #[arg(long)]
    pub special: bool,

    /// Save the generated password under a label
    #[arg(long, value_name = "LABEL", conflicts_with_all = ["service", "username"])]
    pub save: Option<String>,

    /// Save under a service name (requires --username)
    #[arg(long, requires = "username")]
    pub service: Option<String>,

    /// Save under a username (requires --service)
    #[arg(long, requires = "service")]
    pub username: Option<String>,
}

impl GenerateArgs {
    /// Build the generation policy. With no class flag given, all four
    /// classes are enabled so a bare `generate` is immediately useful.
    fn policy(&self, default_length: usize) -> GenerationPolicy {
        let length = self.length.unwrap_or(default_length);
        let any_flag = self.lowercase || self.uppercase || self.digits || self.special;
        if any_flag {
            GenerationPolicy {
                length,
                use_lowercase: self.lowercase,
                use_uppercase: self.uppercase,
                use_digits: self.digits,
                use_special: self.special,
            }
        } else {
            GenerationPolicy::all(length)
        }
    }

    fn identity(&self) -> Option<Identity> {
        if let Some(label) = &self.save {
            return Some(Identity::Label(label.clone()));
        }
        match (&self.service, &self.username) {
            (Some(service), Some(username)) => Some(Identity::Login {
                service: service.clone(),
                username: username.clone(),
            }),
            _ => None,
        }
    }
}

pub fn run(ctx: &CliContext, args: GenerateArgs) -> Result<()> {
    let policy = args.policy(ctx.config.generator.default_length);
    let password = generator::generate(&policy)?;
    println!("{}", *password);

    if let Some(identity) = args.identity() {
        let store = CredentialStore::open(&ctx.paths, ctx.config.store.backend)
            .context("open credential store")?;
        store
            .save(&identity, &password)
            .with_context(|| format!("save credential for {}", identity))?;
        credential::print_saved(&identity);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants;

    fn bare_args() -> GenerateArgs {
        GenerateArgs {
            length: None,
            lowercase: false,
            uppercase: false,
            digits: false,
            special: false,
            save: None,
            service: None,
            username: None,
        }
    }

    #[test]
    fn test_no_class_flags_enables_all() {
        let policy = bare_args().policy(16);
        assert!(policy.use_lowercase);
        assert!(policy.use_uppercase);
        assert!(policy.use_digits);
        assert!(policy.use_special);
        assert_eq!(policy.length, 16);
    }

    #[test]
    fn test_explicit_flags_disable_the_rest() {
        let mut args = bare_args();
        args.digits = true;
        let policy = args.policy(16);
        assert!(policy.use_digits);
        assert!(!policy.use_lowercase);
        assert!(!policy.use_uppercase);
        assert!(!policy.use_special);
    }

    #[test]
    fn test_length_flag_overrides_default() {
        let mut args = bare_args();
        args.length = Some(32);
        assert_eq!(args.policy(constants::DEFAULT_PASSWORD_LENGTH).length, 32);
    }

    #[test]
    fn test_identity_from_label() {
        let mut args = bare_args();
        args.save = Some("mail".into());
        assert_eq!(args.identity(), Some(Identity::Label("mail".into())));
    }

    #[test]
    fn test_identity_from_login() {
        let mut args = bare_args();
        args.service = Some("github".into());
        args.username = Some("alice".into());
        assert_eq!(
            args.identity(),
            Some(Identity::Login {
                service: "github".into(),
                username: "alice".into()
            })
        );
    }

    #[test]
    fn test_no_identity_without_flags() {
        assert_eq!(bare_args().identity(), None);
    }
}
