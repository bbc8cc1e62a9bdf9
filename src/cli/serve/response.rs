//! HTTP response helpers.

use super::Reply;
use crate::utils::mime::types::PLAIN;
use anyhow::{Result, anyhow};
use tiny_http::{Header, Method, Request, Response, StatusCode};

/// Send a rendered reply, headers only for `HEAD`.
pub fn respond(request: Request, reply: Reply) -> Result<()> {
    let allow = (reply.status == 405).then_some("GET, HEAD");

    if is_head_request(&request) {
        return send_head(request, reply.status, reply.content_type, allow);
    }
    send_body(
        request,
        reply.status,
        reply.content_type,
        reply.body.into_bytes(),
        allow,
    )
}

/// Respond with 503 Service Unavailable (server shutting down).
pub fn respond_unavailable(request: Request) -> Result<()> {
    send_body(
        request,
        503,
        PLAIN,
        b"503 Service Unavailable".to_vec(),
        None,
    )
}

fn is_head_request(request: &Request) -> bool {
    request.method() == &Method::Head
}

fn send_head(
    request: Request,
    status: u16,
    content_type: &'static str,
    allow: Option<&'static str>,
) -> Result<()> {
    let response = with_headers(
        Response::empty(StatusCode(status)).boxed(),
        content_type,
        allow,
    )?;
    request.respond(response)?;
    Ok(())
}

fn send_body(
    request: Request,
    status: u16,
    content_type: &'static str,
    body: Vec<u8>,
    allow: Option<&'static str>,
) -> Result<()> {
    let response = with_headers(
        Response::from_data(body)
            .with_status_code(StatusCode(status))
            .boxed(),
        content_type,
        allow,
    )?;
    request.respond(response)?;
    Ok(())
}

fn with_headers(
    mut response: tiny_http::ResponseBox,
    content_type: &'static str,
    allow: Option<&'static str>,
) -> Result<tiny_http::ResponseBox> {
    response.add_header(make_header("Content-Type", content_type)?);
    response.add_header(make_header("Cache-Control", "no-store")?);
    if let Some(methods) = allow {
        response.add_header(make_header("Allow", methods)?);
    }
    Ok(response)
}

fn make_header(key: &'static str, value: &'static str) -> Result<Header> {
    Header::from_bytes(key, value).map_err(|()| anyhow!("invalid header {key}: {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_header() {
        let header = make_header("Allow", "GET, HEAD").unwrap();
        assert!(header.field.equiv("allow"));
        assert_eq!(header.value.as_str(), "GET, HEAD");
    }
}
