use reqwest::Client;
use scraper::{Html, Selector};
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};

const LOGIN_URL: &str = "https://adfs.hsr.ch/adfs/ls/?wa=wsignin1.0&wtrealm=https%3a%2f%2funterricht.hsr.ch%3a443%2f&wctx=https%3a%2f%2funterricht.hsr.ch%2f";
const REPORT_URL: &str = "https://unterricht.hsr.ch/MyStudy/Reporting/TermReport";

const USERNAME_FIELD: &str = "ctl00_ContentPlaceHolder1_UsernameTextBox";
const PASSWORD_FIELD: &str = "ctl00_ContentPlaceHolder1_PasswordTextBox";

/// Logs into the portal and retrieves the term report page as HTML.
///
/// The SSO page serves a `hiddenform` whose hidden fields have to be echoed
/// back alongside the credentials. When the form is absent the session
/// cookie is still valid and the login step is skipped.
pub async fn fetch_report(config: &Config) -> Result<String> {
    let client = Client::builder().cookie_store(true).build()?;

    let login_page = client.get(LOGIN_URL).send().await?;
    if !login_page.status().is_success() {
        return Err(Error::Authentication(format!(
            "login page answered {}, check your credentials and try again",
            login_page.status()
        )));
    }

    if let Some((action, mut fields)) = login_form(&login_page.text().await?)? {
        fields.push((USERNAME_FIELD.to_string(), config.username.clone()));
        fields.push((PASSWORD_FIELD.to_string(), config.password.clone()));

        let submitted = client.post(action).form(&fields).send().await?;
        if !submitted.status().is_success() {
            return Err(Error::Authentication(
                "portal rejected the submitted credentials, check your credentials and try again"
                    .into(),
            ));
        }
    }

    let report = client.get(REPORT_URL).send().await?;
    if !report.status().is_success() {
        return Err(Error::Authentication(format!(
            "term report answered {}, the session was not accepted",
            report.status()
        )));
    }
    Ok(report.text().await?)
}

/// Extracts the SSO form's action URL and hidden fields, or None when the
/// page carries no login form.
fn login_form(html: &str) -> Result<Option<(Url, Vec<(String, String)>)>> {
    let document = Html::parse_document(html);
    let form_selector = Selector::parse(r#"form[name="hiddenform"]"#).unwrap();
    let input_selector = Selector::parse(r#"input[type="hidden"]"#).unwrap();

    let Some(form) = document.select(&form_selector).next() else {
        return Ok(None);
    };

    let base = Url::parse(LOGIN_URL)
        .map_err(|e| Error::Authentication(format!("bad login URL: {e}")))?;
    let action = match form.value().attr("action") {
        Some(action) if !action.is_empty() => base
            .join(action)
            .map_err(|e| Error::Authentication(format!("bad login form action: {e}")))?,
        _ => base,
    };

    let fields = form
        .select(&input_selector)
        .filter_map(|input| {
            let name = input.value().attr("name")?;
            let value = input.value().attr("value").unwrap_or("");
            Some((name.to_string(), value.to_string()))
        })
        .collect();

    Ok(Some((action, fields)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_fields_are_carried_over() {
        let html = r#"<html><body>
            <form name="hiddenform" action="/adfs/ls/submit">
              <input type="hidden" name="wa" value="wsignin1.0" />
              <input type="hidden" name="wresult" value="token" />
              <input type="submit" value="Continue" />
            </form></body></html>"#;
        let (action, fields) = login_form(html).unwrap().unwrap();
        assert_eq!(action.path(), "/adfs/ls/submit");
        assert_eq!(
            fields,
            vec![
                ("wa".to_string(), "wsignin1.0".to_string()),
                ("wresult".to_string(), "token".to_string()),
            ]
        );
    }

    #[test]
    fn page_without_a_login_form_means_already_authenticated() {
        let html = "<html><body><p>Term report</p></body></html>";
        assert!(login_form(html).unwrap().is_none());
    }
}
