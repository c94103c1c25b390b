use std::fs;
use std::path::{Path, PathBuf};

pub fn write(root: &Path, relative: &str, content: &str) -> PathBuf {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().expect("fixture path has a parent")).expect("create dirs");
    fs::write(&path, content).expect("write fixture");
    path
}

/// Component template with one container that reads its device addresses
/// and the `model.name` value.
pub fn component_source(component: &str, container: &str, accelerators: usize) -> String {
    let mut annotations = String::new();
    if accelerators > 0 {
        annotations.push_str(&format!(
            "    strata.io/{container}--accelerators: \"{accelerators}\"\n"
        ));
    }
    format!(
        r#"apiVersion: v1
kind: Pod
metadata:
  name: "{{{{ .AppName }}}}-{component}"
  annotations:
    strata.io/start: "on"
{annotations}spec:
  containers:
    - name: {container}
      image: registry.local/{component}:{{{{ .Version }}}}
      env:
        - name: MODEL
          value: "{{{{ .Values.model.name }}}}"
        - name: ACCELERATOR_ADDRESSES
          value: "{{{{ .env.{container}.ACCELERATOR_ADDRESSES }}}}"
"#
    )
}

/// Template `name` with layers `[[x, y], [z]]`: x and y need one device
/// each, z needs none and exposes `http` on 8000. Serves one model,
/// `ibm-granite/granite-3.3-8b`.
pub fn layered_template(root: &Path, name: &str) {
    write(
        root,
        &format!("{name}/metadata.yaml"),
        &format!(
            "name: {name}\nversion: \"1.2\"\ndescription: Layered demo\nmodels:\n  - ibm-granite/granite-3.3-8b\nlayers:\n  - [x, y]\n  - [z]\n"
        ),
    );
    write(
        root,
        &format!("{name}/values.yaml"),
        "model:\n  name: granite\n  replicas: 1\n",
    );
    write(
        root,
        &format!("{name}/templates/x.yaml.tmpl"),
        &component_source("x", "x-main", 1),
    );
    write(
        root,
        &format!("{name}/templates/y.yaml.tmpl"),
        &component_source("y", "y-main", 1),
    );
    let z = component_source("z", "z-main", 0).replace(
        "    strata.io/start: \"on\"\n",
        "    strata.io/start: \"on\"\n    strata.io/z-main--expose--http: \"8000\"\n",
    );
    write(root, &format!("{name}/templates/z.yaml.tmpl"), &z);
}
