use std::net::{IpAddr, SocketAddr};

use actix_web::{HttpRequest, http};
use woothee::parser::Parser;

pub const UNKNOWN_DEVICE: &str = "Unknown";

/// Best-effort client address. `Forwarded` and `X-Forwarded-For` take
/// precedence over the peer address; any port is dropped.
pub fn client_ip(req: &HttpRequest) -> Option<String> {
    req.connection_info().realip_remote_addr().map(strip_port)
}

fn strip_port(addr: &str) -> String {
    if let Ok(socket_addr) = addr.parse::<SocketAddr>() {
        return socket_addr.ip().to_string();
    }
    let bare = addr.trim_start_matches('[').trim_end_matches(']');
    match bare.parse::<IpAddr>() {
        Ok(ip) => ip.to_string(),
        Err(_) => addr.to_string(),
    }
}

/// Coarse device class from the request's User-Agent.
pub fn device_type(req: &HttpRequest) -> String {
    let user_agent = req
        .headers()
        .get(http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok());

    classify_user_agent(user_agent)
        .unwrap_or(UNKNOWN_DEVICE)
        .to_string()
}

pub fn classify_user_agent(user_agent: Option<&str>) -> Option<&'static str> {
    let user_agent = user_agent.filter(|ua| !ua.trim().is_empty())?;
    let parser = Parser::new();
    let result = parser.parse(user_agent)?;

    match result.category {
        "pc" => Some("desktop"),
        "smartphone" if is_tablet(user_agent, result.os) => Some("tablet"),
        "smartphone" | "mobilephone" => Some("phone"),
        "appliance" if result.os.contains("TV") || result.name.contains("TV") => Some("tv"),
        "appliance" => Some("console"),
        "crawler" => Some("bot"),
        _ => None,
    }
}

// woothee files tablets under "smartphone"
fn is_tablet(user_agent: &str, os: &str) -> bool {
    os == "iPad" || (os == "Android" && !user_agent.contains("Mobile"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    const CHROME_WINDOWS: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
    const SAFARI_IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";
    const SAFARI_IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 17_4 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Mobile/15E148 Safari/604.1";
    const GOOGLEBOT: &str =
        "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)";

    #[test]
    fn classifies_common_agents() {
        assert_eq!(classify_user_agent(Some(CHROME_WINDOWS)), Some("desktop"));
        assert_eq!(classify_user_agent(Some(SAFARI_IPHONE)), Some("phone"));
        assert_eq!(classify_user_agent(Some(SAFARI_IPAD)), Some("tablet"));
        assert_eq!(classify_user_agent(Some(GOOGLEBOT)), Some("bot"));
    }

    #[test]
    fn missing_agent_is_unknown() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(device_type(&req), UNKNOWN_DEVICE);

        let req = TestRequest::default()
            .insert_header((http::header::USER_AGENT, "   "))
            .to_http_request();
        assert_eq!(device_type(&req), UNKNOWN_DEVICE);
    }

    #[test]
    fn forwarded_for_wins_over_peer() {
        let req = TestRequest::default()
            .peer_addr("10.0.0.1:5555".parse().unwrap())
            .insert_header(("x-forwarded-for", "203.0.113.7, 10.0.0.1"))
            .to_http_request();
        assert_eq!(client_ip(&req).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn peer_address_without_port() {
        let req = TestRequest::default()
            .peer_addr("10.0.0.1:5555".parse().unwrap())
            .to_http_request();
        assert_eq!(client_ip(&req).as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn strips_ports_and_brackets() {
        assert_eq!(strip_port("[2001:db8::1]:4711"), "2001:db8::1");
        assert_eq!(strip_port("[2001:db8::1]"), "2001:db8::1");
        assert_eq!(strip_port("192.0.2.4"), "192.0.2.4");
        assert_eq!(strip_port("unknown-host"), "unknown-host");
    }
}
