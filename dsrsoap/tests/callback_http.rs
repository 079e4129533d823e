//! Tests HTTP du récepteur de callbacks
//!
//! Le router est appelé directement via `tower::ServiceExt::oneshot`, sans ouvrir
//! de port.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use dsrsoap::{
    EMPTY_RESPONSE, NEW_EVENT_RESPONSE, NOTIFY_UPDATED_RESPONSE, Notification, NotificationSink,
    ReceiverState, SOAP_CONTENT_TYPE, create_router,
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct CapturingSink {
    received: Mutex<Vec<Notification>>,
}

impl NotificationSink for CapturingSink {
    fn notify(&self, notification: &Notification) {
        self.received.lock().unwrap().push(notification.clone());
    }
}

impl CapturingSink {
    fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.received.lock().unwrap())
    }
}

struct PanickingSink;

impl NotificationSink for PanickingSink {
    fn notify(&self, _notification: &Notification) {
        panic!("sink failure");
    }
}

fn receiver() -> (Router, Arc<CapturingSink>) {
    let sink = Arc::new(CapturingSink::default());
    let router = create_router(ReceiverState::new("DSR-Callback-Receiver", sink.clone()));
    (router, sink)
}

fn soap_post(path: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/soap+xml; charset=utf-8")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Option<String>, String) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

const NOTIFY_UPDATED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">
  <soap:Body>
    <ns:notifyUpdated xmlns:ns="http://xml.assaabloy.com/dsr/2.0">
      <ns:accessPoint>
        <ns:id>AP-100</ns:id>
        <ns:accessPointAttributes>
          <ns:attributes>
            <ns:Name>FIRMWARE_VERSION</ns:Name>
            <ns:Value>2.1.0</ns:Value>
          </ns:attributes>
        </ns:accessPointAttributes>
      </ns:accessPoint>
    </ns:notifyUpdated>
  </soap:Body>
</soap:Envelope>"#;

const NEW_EVENT: &str = r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope">
  <soap:Body>
    <ns:newEvent xmlns:ns="http://xml.assaabloy.com/dsr/2.0">
      <ns:logEntry>
        <ns:origin><ns:logOriginType>ACCESS_POINT</ns:logOriginType></ns:origin>
        <ns:family>ALARM</ns:family>
        <ns:code>DOOR_FORCED</ns:code>
        <ns:timeStamp>2024-03-01T10:00:00Z</ns:timeStamp>
        <ns:logData><ns:key>door</ns:key><ns:value>D1</ns:value></ns:logData>
        <ns:logData><ns:key>zone</ns:key><ns:value>Z3</ns:value></ns:logData>
      </ns:logEntry>
    </ns:newEvent>
  </soap:Body>
</soap:Envelope>"#;

#[tokio::test]
async fn test_notify_updated_is_acknowledged() {
    let (router, sink) = receiver();
    let (status, content_type, body) = send(router, soap_post("/", NOTIFY_UPDATED)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some(SOAP_CONTENT_TYPE));
    assert_eq!(body, NOTIFY_UPDATED_RESPONSE);

    let received = sink.take();
    assert_eq!(received.len(), 1);
    let Notification::StatusUpdate(Some(ap)) = &received[0] else {
        panic!("expected a status update, got {:?}", received[0]);
    };
    assert_eq!(ap.access_point_id, "AP-100");
    assert_eq!(ap.serial_number, "N/A");
    assert_eq!(ap.online, "N/A");
    assert_eq!(ap.sync_status, "N/A");
    assert_eq!(ap.firmware_upgrade_status, "N/A");
    assert_eq!(ap.time_of_last_firmware_upgrade, "N/A");
    assert_eq!(ap.attributes.len(), 1);
    assert_eq!(ap.attributes["FIRMWARE_VERSION"], "2.1.0");
}

#[tokio::test]
async fn test_new_event_is_acknowledged() {
    let (router, sink) = receiver();
    let (status, content_type, body) = send(router, soap_post("/", NEW_EVENT)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some(SOAP_CONTENT_TYPE));
    assert_eq!(body, NEW_EVENT_RESPONSE);

    let received = sink.take();
    let Notification::Event(Some(event)) = &received[0] else {
        panic!("expected an event, got {:?}", received[0]);
    };
    assert_eq!(event.origin_type, "ACCESS_POINT");
    assert_eq!(event.family, "ALARM");
    assert_eq!(event.code, "DOOR_FORCED");
    assert_eq!(event.time_stamp, "2024-03-01T10:00:00Z");
    let keys: Vec<_> = event.log_data.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, ["door", "zone"]);
}

#[tokio::test]
async fn test_unrecognized_operation_gets_empty_envelope() {
    let (router, sink) = receiver();
    let xml = r#"<soap:Envelope xmlns:soap="http://www.w3.org/2003/05/soap-envelope"><soap:Body><ns:heartbeat xmlns:ns="urn:test"/></soap:Body></soap:Envelope>"#;
    let (status, _, body) = send(router, soap_post("/", xml)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, EMPTY_RESPONSE);
    assert!(matches!(
        sink.take().as_slice(),
        [Notification::Unrecognized { .. }]
    ));
}

#[tokio::test]
async fn test_malformed_xml_is_rejected() {
    let (router, sink) = receiver();
    let (status, content_type, body) =
        send(router, soap_post("/", "<soap:Envelope><soap:Body>")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_ne!(content_type.as_deref(), Some(SOAP_CONTENT_TYPE));
    assert!(!body.contains("Envelope"));
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn test_deeply_nested_body_is_rejected() {
    let depth = 200_000;
    let xml = format!(
        "<Envelope><Body>{}{}</Body></Envelope>",
        "<a>".repeat(depth),
        "</a>".repeat(depth)
    );
    let (router, sink) = receiver();
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "text/xml")
        .body(Body::from(xml))
        .unwrap();
    let (status, _, body) = send(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body.contains("Envelope"));
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn test_non_xml_content_type_is_rejected() {
    let (router, sink) = receiver();
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(NOTIFY_UPDATED))
        .unwrap();
    let (status, _, _) = send(router, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(sink.take().is_empty());
}

#[tokio::test]
async fn test_text_xml_content_type_is_accepted() {
    let (router, _sink) = receiver();
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header(header::CONTENT_TYPE, "text/xml; charset=utf-8")
        .header("SOAPAction", "\"urn:newEvent\"")
        .body(Body::from(NEW_EVENT))
        .unwrap();
    let (status, _, body) = send(router, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, NEW_EVENT_RESPONSE);
}

#[tokio::test]
async fn test_post_on_any_path() {
    for path in ["/health", "/dsr/callback", "/a/b/c"] {
        let (router, sink) = receiver();
        let (status, _, body) = send(router, soap_post(path, NOTIFY_UPDATED)).await;

        assert_eq!(status, StatusCode::OK, "path {}", path);
        assert_eq!(body, NOTIFY_UPDATED_RESPONSE);
        assert_eq!(sink.take().len(), 1);
    }
}

#[tokio::test]
async fn test_health_endpoints() {
    for path in ["/", "/health"] {
        let (router, _sink) = receiver();
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let (status, content_type, body) = send(router, request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("application/json"));

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["service"], "DSR-Callback-Receiver");
        assert!(json["timestamp"].as_str().is_some_and(|t| !t.is_empty()));
    }
}

#[tokio::test]
async fn test_get_unknown_path_is_not_found() {
    let (router, _sink) = receiver();
    let request = Request::builder().uri("/nowhere").body(Body::empty()).unwrap();
    let (status, _, _) = send(router, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_attribute_shapes_normalize_identically() {
    let shapes = [
        // un seul élément, clés en minuscules
        "<attributes><name>FIRMWARE_VERSION</name><value>2.1.0</value></attributes>",
        // clés en majuscules
        "<attributes><NAME>FIRMWARE_VERSION</NAME><VALUE>2.1.0</VALUE></attributes>",
        // attributs XML
        r#"<attributes Name="FIRMWARE_VERSION" Value="2.1.0"/>"#,
    ];

    let mut maps = Vec::new();
    for shape in shapes {
        let xml = format!(
            "<Envelope><Body><notifyUpdated><accessPoint><id>AP-7</id>\
             <accessPointAttributes>{}</accessPointAttributes>\
             </accessPoint></notifyUpdated></Body></Envelope>",
            shape
        );
        let (router, sink) = receiver();
        let (status, _, _) = send(router, soap_post("/", &xml)).await;
        assert_eq!(status, StatusCode::OK);

        let Some(Notification::StatusUpdate(Some(ap))) = sink.take().pop() else {
            panic!("expected a status update for {}", shape);
        };
        maps.push(ap.attributes);
    }

    assert!(maps.iter().all(|m| m == &maps[0]));
    assert_eq!(maps[0]["FIRMWARE_VERSION"], "2.1.0");
}

#[tokio::test]
async fn test_attribute_sequence() {
    let xml = "<Envelope><Body><notifyUpdated><accessPoint><id>AP-8</id>\
               <serialNumber>SN-1</serialNumber><online>true</online>\
               <accessPointAttributes>\
               <attributes><name>FIRMWARE_VERSION</name><value>3.0</value></attributes>\
               <attributes><name>BATTERY</name><value>OK</value></attributes>\
               <attributes><value>orphan</value></attributes>\
               <attributes><name>TAMPER</name></attributes>\
               </accessPointAttributes>\
               </accessPoint></notifyUpdated></Body></Envelope>";
    let (router, sink) = receiver();
    send(router, soap_post("/", xml)).await;

    let Some(Notification::StatusUpdate(Some(ap))) = sink.take().pop() else {
        panic!("expected a status update");
    };
    assert_eq!(ap.serial_number, "SN-1");
    assert_eq!(ap.online, "true");
    assert_eq!(ap.attributes.len(), 3);
    assert_eq!(ap.attributes["FIRMWARE_VERSION"], "3.0");
    assert_eq!(ap.attributes["BATTERY"], "OK");
    assert_eq!(ap.attributes["TAMPER"], "N/A");
}

#[tokio::test]
async fn test_sink_panic_returns_server_error() {
    let router = create_router(ReceiverState::new("test", Arc::new(PanickingSink)));
    let (status, content_type, body) = send(router, soap_post("/", NOTIFY_UPDATED)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_ne!(content_type.as_deref(), Some(SOAP_CONTENT_TYPE));
    assert!(!body.contains("Envelope"));
}
