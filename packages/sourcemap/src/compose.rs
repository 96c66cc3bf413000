use sourcemap::SourceMap;

use crate::SourceMapBuilder;

/// Compose two maps so the result points straight at the earliest sources
///
/// `former` maps an intermediate file back to its sources, `latter` maps
/// the final output to that intermediate file. Either may be missing, in
/// which case the other is returned unchanged. Mappings of `latter` that
/// land where `former` has no information are dropped.
pub fn compose_source_maps(former: Option<&SourceMap>, latter: Option<SourceMap>) -> Option<SourceMap> {
    let (former, latter) = match (former, latter) {
        (None, latter) => return latter,
        (Some(former), None) => return Some(former.clone()),
        (Some(former), Some(latter)) => (former, latter),
    };

    let mut builder = SourceMapBuilder::new(latter.get_file());

    for token in latter.tokens() {
        let Some(original) = former.lookup_token(token.get_src_line(), token.get_src_col()) else {
            continue;
        };
        let Some(source) = original.get_source() else {
            continue;
        };

        let contents = former.get_source_contents(original.get_src_id());
        let source_id = builder.add_source(source, contents);
        builder.add_mapping(
            token.get_dst_line(),
            token.get_dst_col(),
            source_id,
            original.get_src_line(),
            original.get_src_col(),
            original.get_name().or(token.get_name()),
        );
    }

    Some(builder.build())
}
