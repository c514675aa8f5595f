//! OVH request signature.
//!
//! Every authenticated call carries `X-Ovh-Signature`, computed as
//! `"$1$" + hex(sha1(secret + consumer + method + url + body + timestamp))`
//! with the parts joined by `+`. `url` is the full request URL including the
//! query string and `body` the exact JSON text sent (empty when there is none).

use sha1::{Digest, Sha1};

pub fn signature(
    application_secret: &str,
    consumer_key: &str,
    method: &str,
    url: &str,
    body: &str,
    timestamp: i64,
) -> String {
    let payload = format!("{application_secret}+{consumer_key}+{method}+{url}+{body}+{timestamp}");
    format!("$1${}", hex::encode(Sha1::digest(payload.as_bytes())))
}
