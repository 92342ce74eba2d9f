use serde::Deserialize;

use crate::horizon::{HorizonError, Problem};

pub(crate) async fn fetch_it(
    client: &reqwest::Client,
    url: &str,
) -> Result<reqwest::Response, HorizonError> {
    Ok(client.get(url).send().await?)
}

/// Read a response body. Non-success statuses become `HorizonError::Problem`, anything else
/// is deserialized as JSON.
pub(crate) async fn parse_response<T: for<'a> Deserialize<'a>>(
    res: reqwest::Response,
) -> Result<T, HorizonError> {
    let status = res.status();
    let text = res.text().await?;
    if !status.is_success() {
        return Err(Problem::from_body(status.as_u16(), &text).into());
    }
    Ok(serde_json::from_str(&text)?)
}

/// Easy fetching of a URL. Attempts to serde JSON deserialize the result
pub(crate) async fn ez_fetch_json<T: for<'a> Deserialize<'a>>(
    client: &reqwest::Client,
    url: &str,
) -> Result<T, HorizonError> {
    let res = fetch_it(client, url).await?;
    parse_response(res).await
}

/// Post a urlencoded form, and deserialize the JSON result
pub(crate) async fn post_form<T: for<'a> Deserialize<'a>>(
    client: &reqwest::Client,
    url: &str,
    form: &[(&str, &str)],
) -> Result<T, HorizonError> {
    let res = client.post(url).form(form).send().await?;
    parse_response(res).await
}
