use dash_mpd::{resolve_manifest, DashError, ResolverConfig, SegmentSource};

const MANIFEST_URL: &str = "https://media.example.com/vod/title/manifest.mpd?token=secret";

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

const TIMELINE_MPD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<MPD xmlns="urn:mpeg:dash:schema:mpd:2011" type="static" mediaPresentationDuration="PT12S">
  <Period id="p0">
    <AdaptationSet mimeType="video/mp4" codecs="avc1.640028">
      <SegmentTemplate timescale="1000" media="$RepresentationID$/seg-$Number%05d$.m4s" initialization="$RepresentationID$/init.mp4" startNumber="5">
        <SegmentTimeline>
          <S t="0" d="2000" r="2"/>
          <S d="4000"/>
        </SegmentTimeline>
      </SegmentTemplate>
      <Representation id="v1080" bandwidth="4500000" width="1920" height="1080"/>
      <Representation id="v720" bandwidth="2500000" width="1280" height="720"/>
    </AdaptationSet>
  </Period>
</MPD>"#;

#[test]
fn timeline_numbers_and_times() {
    init_tracing();
    let expansion = resolve_manifest(TIMELINE_MPD, MANIFEST_URL, &ResolverConfig::default()).unwrap();
    assert_eq!(expansion.contexts.len(), 2);
    assert!(expansion.unsupported.is_empty());

    let context = &expansion.contexts[0];
    let numbers: Vec<u64> = context.segments().map(|s| s.number).collect();
    let times: Vec<u64> = context.segments().map(|s| s.time).collect();
    assert_eq!(numbers, [5, 6, 7, 8]);
    assert_eq!(times, [0, 2000, 4000, 6000]);
    assert_eq!(context.source, SegmentSource::Timeline);
    assert_eq!(context.label, "1920x1080 • 4500000bps • avc1.640028");
    assert!((context.duration_seconds() - 10.0).abs() < f64::EPSILON);
}

#[test]
fn urls_resolve_against_manifest_directory() {
    let expansion = resolve_manifest(TIMELINE_MPD, MANIFEST_URL, &ResolverConfig::default()).unwrap();
    assert_eq!(expansion.base_options.len(), 1);
    let option = &expansion.base_options[0];
    assert_eq!(option.url, "https://media.example.com/vod/title/");

    let context = &expansion.contexts[1];
    let init = context.init_url(option).unwrap().unwrap();
    assert_eq!(init.as_str(), "https://media.example.com/vod/title/v720/init.mp4");

    let segments = context.segment_urls(option).unwrap();
    assert_eq!(segments[0].url, "https://media.example.com/vod/title/v720/seg-00005.m4s");
    assert_eq!(segments[3].url, "https://media.example.com/vod/title/v720/seg-00008.m4s");
}

#[test]
fn template_attributes_inherit_across_scopes() {
    let mpd = r#"<MPD type="static">
      <Period>
        <SegmentTemplate timescale="90000" duration="180000" initialization="init-$Bandwidth$.mp4"/>
        <AdaptationSet>
          <SegmentTemplate media="as-$Number$.m4s" startNumber="0"/>
          <Representation id="a" bandwidth="128000">
            <SegmentTemplate media="rep-$Time$.m4s"/>
          </Representation>
          <Representation id="b" bandwidth="64000"/>
        </AdaptationSet>
      </Period>
    </MPD>"#;
    let expansion = resolve_manifest(mpd, MANIFEST_URL, &ResolverConfig::default()).unwrap();
    let a = &expansion.contexts[0];
    let b = &expansion.contexts[1];

    assert_eq!(a.media_template, "rep-$Time$.m4s");
    assert_eq!(a.start_number, 0);
    assert_eq!(a.timescale, 90000);
    assert_eq!(a.source, SegmentSource::FixedDuration);
    assert_eq!(b.media_template, "as-$Number$.m4s");
    assert_eq!(b.init_template.as_deref(), Some("init-$Bandwidth$.mp4"));

    let option = &expansion.base_options[0];
    assert_eq!(
        b.init_url(option).unwrap().map(String::from).as_deref(),
        Some("https://media.example.com/vod/title/init-64000.mp4")
    );
}

#[test]
fn fixed_duration_preview_uses_configured_count() {
    let mpd = r#"<MPD><Period><AdaptationSet>
      <Representation id="r" bandwidth="1">
        <SegmentTemplate media="s$Number$.m4s" duration="4" startNumber="1"/>
      </Representation>
    </AdaptationSet></Period></MPD>"#;

    let default = resolve_manifest(mpd, MANIFEST_URL, &ResolverConfig::default()).unwrap();
    assert_eq!(default.contexts[0].segment_count(), 10);

    let config = ResolverConfig { preview_segment_count: 3, ..Default::default() };
    let preview = resolve_manifest(mpd, MANIFEST_URL, &config).unwrap();
    let times: Vec<u64> = preview.contexts[0].segments().map(|s| s.time).collect();
    assert_eq!(times, [0, 4, 8]);
}

#[test]
fn cdn_alternates_become_base_options() {
    let mpd = r#"<MPD>
      <BaseURL serviceLocation="cdn-a">https://a.example.net/content/</BaseURL>
      <BaseURL serviceLocation="cdn-b">https://b.example.net/content/</BaseURL>
      <BaseURL>https://a.example.net/content/</BaseURL>
      <Period>
        <BaseURL>period-1/</BaseURL>
        <AdaptationSet>
          <BaseURL>video/</BaseURL>
          <Representation id="v" bandwidth="1000">
            <SegmentTemplate media="$Number$.m4s" duration="2"/>
          </Representation>
        </AdaptationSet>
      </Period>
    </MPD>"#;
    let expansion = resolve_manifest(mpd, MANIFEST_URL, &ResolverConfig::default()).unwrap();
    let labels: Vec<&str> = expansion.base_options.iter().map(|o| o.label.as_str()).collect();
    assert_eq!(labels, ["cdn-a", "cdn-b"]);

    let context = &expansion.contexts[0];
    assert_eq!(context.base_parts, ["period-1/", "video/"]);
    let first_a = &context.segment_urls(&expansion.base_options[0]).unwrap()[0];
    let first_b = &context.segment_urls(&expansion.base_options[1]).unwrap()[0];
    assert_eq!(first_a.url, "https://a.example.net/content/period-1/video/1.m4s");
    assert_eq!(first_b.url, "https://b.example.net/content/period-1/video/1.m4s");
}

#[test]
fn non_template_addressing_is_unsupported() {
    let mpd = r#"<MPD><Period><AdaptationSet>
      <Representation id="list"><SegmentList><SegmentURL media="a.m4s"/></SegmentList></Representation>
      <Representation id="base"><SegmentBase indexRange="0-100"/></Representation>
      <Representation id="bare"/>
      <Representation id="no-timing"><SegmentTemplate media="x.m4s"/></Representation>
    </AdaptationSet></Period></MPD>"#;
    let expansion = resolve_manifest(mpd, MANIFEST_URL, &ResolverConfig::default()).unwrap();
    assert!(expansion.contexts.is_empty());

    let reasons: Vec<(&str, &str)> = expansion
        .unsupported
        .iter()
        .map(|u| (u.representation_id.as_str(), u.reason.as_str()))
        .collect();
    assert_eq!(
        reasons,
        [
            ("list", "uses SegmentList addressing"),
            ("base", "uses SegmentBase addressing"),
            ("bare", "has no SegmentTemplate, SegmentList or SegmentBase"),
            ("no-timing", "SegmentTemplate has neither SegmentTimeline nor @duration"),
        ]
    );
}

#[test]
fn timeline_cap_marks_truncation() {
    let mpd = r#"<MPD><Period><AdaptationSet><Representation id="r">
      <SegmentTemplate media="$Time$.m4s"><SegmentTimeline><S d="1" r="1000000000"/></SegmentTimeline></SegmentTemplate>
    </Representation></AdaptationSet></Period></MPD>"#;
    let config = ResolverConfig { max_timeline_segments: 25, ..Default::default() };
    let expansion = resolve_manifest(mpd, MANIFEST_URL, &config).unwrap();
    assert_eq!(expansion.contexts[0].segment_count(), 25);
    assert!(expansion.contexts[0].truncated);
}

#[test]
fn wrong_root_and_broken_xml_are_errors() {
    let config = ResolverConfig::default();
    assert!(matches!(
        resolve_manifest("<html/>", MANIFEST_URL, &config),
        Err(DashError::UnexpectedRoot(name)) if name == "html"
    ));
    assert!(resolve_manifest("<MPD><Period>", MANIFEST_URL, &config).unwrap_err().is_syntax());
}

#[test]
fn expansion_serializes_camel_case() {
    let expansion = resolve_manifest(TIMELINE_MPD, MANIFEST_URL, &ResolverConfig::default()).unwrap();
    let json = serde_json::to_value(&expansion).unwrap();
    assert_eq!(json["contexts"][0]["representationId"], "v1080");
    assert_eq!(json["contexts"][0]["startNumber"], 5);
    assert_eq!(json["contexts"][0]["groups"][0]["segments"][1]["time"], 2000);
    assert_eq!(json["baseOptions"][0]["url"], "https://media.example.com/vod/title/");
}

#[test]
fn nesting_limit_comes_from_config() {
    let nested = "<MPD><Period><AdaptationSet><Representation><x><y/></x></Representation></AdaptationSet></Period></MPD>";
    let strict = ResolverConfig { max_xml_depth: 5, ..Default::default() };
    assert!(matches!(resolve_manifest(nested, MANIFEST_URL, &strict), Err(DashError::TooDeep(5))));
    assert!(resolve_manifest(nested, MANIFEST_URL, &ResolverConfig::default()).is_ok());
}
