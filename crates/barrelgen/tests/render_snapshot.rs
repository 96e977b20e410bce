use barrelgen::app::identifier::to_identifier;
use barrelgen::app::render::{ModuleFormat, RenderOptions, Renderer};
use barrelgen::domain::model::FileEntry;
use insta::assert_snapshot;

fn entries(paths: &[&str]) -> Vec<FileEntry> {
    paths
        .iter()
        .map(|path| FileEntry {
            path: (*path).to_owned(),
            identifier: to_identifier(path),
        })
        .collect()
}

#[test]
fn cjs_module_renders() {
    let renderer = Renderer::new().expect("renderer");
    let rendered = renderer
        .render(
            ModuleFormat::Cjs,
            &entries(&["a.js", "nested/b.js"]),
            &RenderOptions::default(),
        )
        .expect("render");

    assert_snapshot!(rendered, @r"
const a$46$js = require('./a.js')
const nested$47$b$46$js = require('./nested/b.js')

module.exports = [
	a$46$js,
	nested$47$b$46$js
]
");
}

#[test]
fn es_module_renders() {
    let renderer = Renderer::new().expect("renderer");
    let rendered = renderer
        .render(
            ModuleFormat::Es,
            &entries(&["a.js", "nested/b.js"]),
            &RenderOptions::default(),
        )
        .expect("render");

    assert_snapshot!(rendered, @r"
import a$46$js from './a.js'
import nested$47$b$46$js from './nested/b.js'

export default [
	a$46$js,
	nested$47$b$46$js
]
");
}

#[test]
fn cjs_module_with_paths_renders() {
    let renderer = Renderer::new().expect("renderer");
    let options = RenderOptions {
        export_with_path: true,
        ..RenderOptions::default()
    };
    let rendered = renderer
        .render(ModuleFormat::Cjs, &entries(&["a.js", "nested/b.js"]), &options)
        .expect("render");

    assert_snapshot!(rendered, @r"
const a$46$js = require('./a.js')
const nested$47$b$46$js = require('./nested/b.js')

module.exports = [
	{ path: 'a.js', module: a$46$js },
	{ path: 'nested/b.js', module: nested$47$b$46$js }
]
");
}
