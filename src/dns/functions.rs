//! The impls and functions
//!
use std::{io, time::{Duration, Instant}};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, ToSocketAddrs, UdpSocket};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::{Name, RData, RecordType};
use log::*;
use crate::dns::{ResolveError, ResolveErrorKind};

const DNS_PORT: u16 = 53;
const DNS_TIMEOUT: Duration = Duration::from_secs(2);
const MAX_PACKET_LENGTH: usize = 4096;

/// Resolve `host` to an IPv4 address using the DNS server `server` (`host` or `host:port`).
pub fn resolve(
    host: &str,
    server: &str,
) -> Result<String, ResolveError>
{
    let timer = Instant::now();
    let result = query_a_record(host, server);
    debug!("dns query for {} on {}: {:?} ({:?})", host, server, result, timer.elapsed());

    result
        .map(|address| address.to_string())
        .map_err(|kind| ResolveError { host: host.to_string(), server: server.to_string(), kind })
}

fn query_a_record(
    host: &str,
    server: &str,
) -> Result<Ipv4Addr, ResolveErrorKind>
{
    let server_address = server_address(server)
        .to_socket_addrs()?
        .next()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no address found for dns server {}", server)))?;
    let local_address: SocketAddr = if server_address.is_ipv4() {
        (Ipv4Addr::UNSPECIFIED, 0).into()
    } else {
        (Ipv6Addr::UNSPECIFIED, 0).into()
    };

    let socket = UdpSocket::bind(local_address)?;
    socket.set_write_timeout(Some(DNS_TIMEOUT))?;
    socket.connect(server_address)?;

    let query = build_query(rand::random(), host)?;
    socket.send(&query.to_vec()?)?;

    let deadline = Instant::now() + DNS_TIMEOUT;
    let mut buffer = [0_u8; MAX_PACKET_LENGTH];
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(io::Error::new(io::ErrorKind::TimedOut, "no answer from dns server").into());
        }
        socket.set_read_timeout(Some(remaining))?;
        let length = socket.recv(&mut buffer)?;

        let response = match Message::from_vec(&buffer[..length]) {
            Ok(response) => response,
            Err(error) => {
                debug!("skipping undecodable dns reply: {}", error);
                continue;
            }
        };
        if response.id() != query.id() || response.message_type() != MessageType::Response {
            debug!("skipping dns reply with id {}, waiting for {}", response.id(), query.id());
            continue;
        }
        return first_a_record(&response);
    }
}

/// Add the default DNS port if the server has none.
pub fn server_address(server: &str) -> String {
    if let Ok(ip) = server.parse::<IpAddr>() {
        SocketAddr::new(ip, DNS_PORT).to_string()
    } else if server.contains(':') {
        server.to_string()
    } else {
        format!("{}:{}", server, DNS_PORT)
    }
}

/// A recursive query for the A record of `host`.
pub fn build_query(
    id: u16,
    host: &str,
) -> Result<Message, ResolveErrorKind>
{
    let name = host.trim_end_matches('.');
    if name.is_empty() {
        return Err(ResolveErrorKind::InvalidName(host.to_string()));
    }
    let name = Name::from_ascii(format!("{}.", name))?;

    let mut query = Message::new();
    query.set_id(id)
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .add_query(Query::query(name, RecordType::A));
    Ok(query)
}

/// The first A record in the answer section; CNAMEs in front of it are skipped.
pub fn first_a_record(response: &Message) -> Result<Ipv4Addr, ResolveErrorKind> {
    if response.response_code() != ResponseCode::NoError {
        return Err(ResolveErrorKind::Rcode(response.response_code().into()));
    }
    response.answers()
        .iter()
        .find_map(|record| match record.data() {
            Some(RData::A(address)) => Some(address.0),
            _ => None,
        })
        .ok_or(ResolveErrorKind::NoResults)
}

/// Answer a single query on a local UDP port. A reply with another id is sent first
/// when `stray_reply` is set.
#[cfg(test)]
pub fn spawn_test_server(
    address: Option<Ipv4Addr>,
    response_code: ResponseCode,
    stray_reply: bool,
) -> (String, std::thread::JoinHandle<()>)
{
    let socket = UdpSocket::bind("127.0.0.1:0").unwrap();
    let server = socket.local_addr().unwrap().to_string();
    let handle = std::thread::spawn(move || {
        let mut buffer = [0_u8; MAX_PACKET_LENGTH];
        let (length, peer) = socket.recv_from(&mut buffer).unwrap();
        let query = Message::from_vec(&buffer[..length]).unwrap();
        if stray_reply {
            let stray = test_response(query.id().wrapping_add(1), &query, ResponseCode::NoError, Some(Ipv4Addr::new(192, 0, 2, 1)));
            socket.send_to(&stray.to_vec().unwrap(), peer).unwrap();
        }
        let reply = test_response(query.id(), &query, response_code, address);
        socket.send_to(&reply.to_vec().unwrap(), peer).unwrap();
    });
    (server, handle)
}

#[cfg(test)]
fn test_response(
    id: u16,
    query: &Message,
    response_code: ResponseCode,
    address: Option<Ipv4Addr>,
) -> Message
{
    use hickory_proto::rr::{Record, rdata::A};

    let mut response = Message::new();
    response.set_id(id)
        .set_message_type(MessageType::Response)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(true)
        .set_recursion_available(true)
        .set_response_code(response_code);
    for question in query.queries() {
        response.add_query(question.clone());
        if let Some(address) = address {
            response.add_answer(Record::from_rdata(question.name().clone(), 300, RData::A(A(address))));
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::rr::{Record, rdata::{A, CNAME}};

    fn answer(records: Vec<RData>) -> Message {
        let query = build_query(7, "h1.example.com").unwrap();
        let name = query.queries()[0].name().clone();
        let mut response = query.clone();
        response.set_message_type(MessageType::Response);
        for data in records {
            response.add_answer(Record::from_rdata(name.clone(), 300, data));
        }
        response
    }

    #[test]
    fn unit_server_address_adds_default_port() {
        assert_eq!(server_address("10.0.0.53"), "10.0.0.53:53");
        assert_eq!(server_address("10.0.0.53:5353"), "10.0.0.53:5353");
        assert_eq!(server_address("::1"), "[::1]:53");
        assert_eq!(server_address("[::1]:5353"), "[::1]:5353");
        assert_eq!(server_address("ns1.example.com"), "ns1.example.com:53");
    }

    #[test]
    fn unit_build_query() {
        let query = build_query(0x1234, "h1.example.com.").unwrap();
        assert_eq!(query.id(), 0x1234);
        assert_eq!(query.message_type(), MessageType::Query);
        assert!(query.recursion_desired());
        assert_eq!(query.queries().len(), 1);
        assert_eq!(query.queries()[0].name().to_ascii(), "h1.example.com.");
        assert_eq!(query.queries()[0].query_type(), RecordType::A);
        assert!(query.to_vec().is_ok());
    }

    #[test]
    fn unit_build_query_rejects_invalid_names() {
        assert!(matches!(build_query(1, ""), Err(ResolveErrorKind::InvalidName(_))));
        assert!(matches!(build_query(1, "."), Err(ResolveErrorKind::InvalidName(_))));
        assert!(matches!(build_query(1, &"a".repeat(64)), Err(ResolveErrorKind::Proto(_))));
    }

    #[test]
    fn unit_first_a_record_skips_cname() {
        let response = answer(vec![
            RData::CNAME(CNAME(Name::from_ascii("real.example.com.").unwrap())),
            RData::A(A(Ipv4Addr::new(10, 0, 0, 7))),
            RData::A(A(Ipv4Addr::new(10, 0, 0, 8))),
        ]);
        assert_eq!(first_a_record(&response).unwrap(), Ipv4Addr::new(10, 0, 0, 7));
    }

    #[test]
    fn unit_first_a_record_without_answers() {
        let error = first_a_record(&answer(Vec::new())).unwrap_err();
        assert!(matches!(error, ResolveErrorKind::NoResults));
        assert_eq!(error.to_string(), "No results");
    }

    #[test]
    fn unit_first_a_record_rcode() {
        let mut response = answer(Vec::new());
        response.set_response_code(ResponseCode::NXDomain);
        let error = first_a_record(&response).unwrap_err();
        assert!(matches!(error, ResolveErrorKind::Rcode(3)));
        assert_eq!(error.to_string(), "server returned rcode 3");
    }

    #[test]
    fn unit_resolve_against_local_server() {
        let (server, handle) = spawn_test_server(Some(Ipv4Addr::new(192, 168, 1, 20)), ResponseCode::NoError, false);

        assert_eq!(resolve("heketi.example.com", &server).unwrap(), "192.168.1.20");
        handle.join().unwrap();
    }

    #[test]
    fn unit_resolve_skips_reply_for_another_query() {
        let (server, handle) = spawn_test_server(Some(Ipv4Addr::new(192, 168, 1, 20)), ResponseCode::NoError, true);

        assert_eq!(resolve("heketi.example.com", &server).unwrap(), "192.168.1.20");
        handle.join().unwrap();
    }

    #[test]
    fn unit_resolve_no_results_message() {
        let (server, handle) = spawn_test_server(None, ResponseCode::NoError, false);

        let error = resolve("heketi.example.com", &server).unwrap_err();
        assert_eq!(error.to_string(), format!("Can't resolve 'heketi.example.com' on {}: No results", server));
        handle.join().unwrap();
    }
}
