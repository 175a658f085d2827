use clap::Parser;
use dialoguer::Password;
use qaboard::{
    forms::AuthError, session::google_sign_in, AuthForm, Backend, Credentials, Session,
};
use tracing::instrument;

use super::terminal::print_notice;

#[derive(Debug, Parser)]
#[command(about = "Sign in to an existing account")]
pub struct Login {
    /// Email address
    #[arg(long, short, required_unless_present = "google")]
    email: Option<String>,

    /// Password. Prompted for when omitted.
    #[arg(long, short)]
    password: Option<String>,

    /// Continue with Google instead
    #[arg(long, conflicts_with_all = ["email", "password"])]
    google: bool,
}

impl Login {
    #[instrument(level = "debug", skip_all)]
    pub fn run<B: Backend>(self, session: &mut Session<B>) -> anyhow::Result<()> {
        if self.google {
            print_notice(&google_sign_in());
            return Ok(());
        }

        let password = match self.password {
            Some(password) => password,
            None => prompt_password("Password", false)?,
        };
        let form = AuthForm::Login(Credentials {
            email: self.email.unwrap_or_default(),
            password,
        });
        submit(session, &form)
    }
}

#[derive(Debug, Parser)]
#[command(about = "Create an account")]
pub struct Register {
    /// Full name
    #[arg(long, short)]
    name: String,

    /// Email address
    #[arg(long, short)]
    email: String,

    /// Password. Prompted for when omitted.
    #[arg(long, short)]
    password: Option<String>,

    /// The password again
    #[arg(long)]
    confirm_password: Option<String>,
}

impl Register {
    #[instrument(level = "debug", skip_all)]
    pub fn run<B: Backend>(self, session: &mut Session<B>) -> anyhow::Result<()> {
        let (password, confirm_password) = match (self.password, self.confirm_password) {
            (Some(password), Some(confirm)) => (password, confirm),
            (Some(password), None) => {
                let confirm = prompt_password("Confirm Password", false)?;
                (password, confirm)
            }
            (None, confirm) => {
                let password = prompt_password("Password", confirm.is_none())?;
                let confirm = confirm.unwrap_or_else(|| password.clone());
                (password, confirm)
            }
        };

        let form = AuthForm::Register {
            name: self.name,
            credentials: Credentials {
                email: self.email,
                password,
            },
            confirm_password,
        };
        submit(session, &form)
    }
}

fn prompt_password(prompt: &str, confirm: bool) -> anyhow::Result<String> {
    let mut input = Password::new().with_prompt(prompt).allow_empty_password(true);
    if confirm {
        input = input.with_confirmation("Confirm Password", "Passwords don't match");
    }
    Ok(input.interact()?)
}

fn submit<B: Backend>(session: &mut Session<B>, form: &AuthForm) -> anyhow::Result<()> {
    match session.sign_in(form) {
        Ok(notice) => {
            print_notice(&notice);
            Ok(())
        }
        Err(e) => {
            print_notice(&AuthError::notice(e));
            Err(e.into())
        }
    }
}
