use pyml::imports::{ImportResolver, ImportSet, resolve};

#[test]
fn special_names() {
    assert_eq!(resolve("time.sleep"), "from time import sleep");
    assert_eq!(resolve("datetime"), "from datetime import datetime");
    for name in ["math", "random", "os", "sys"] {
        assert_eq!(resolve(name), format!("import {}", name));
    }
}

#[test]
fn generic_rule() {
    assert_eq!(resolve("json"), "import json");
    assert_eq!(resolve("os.path"), "from os import path");
    assert_eq!(resolve("collections.abc.Mapping"), "from collections.abc import Mapping");
    assert_eq!(resolve("a.b.c.d"), "from a.b.c import d");
}

#[test]
fn aliases() {
    assert_eq!(resolve("numpy as np"), "import numpy as np");
    assert_eq!(resolve("matplotlib.pyplot as plt"), "from matplotlib import pyplot as plt");
    assert_eq!(resolve("a.b.c as d"), "from a.b import c as d");
}

#[test]
fn surrounding_whitespace_is_ignored() {
    assert_eq!(resolve("  math "), "import math");
}

#[test]
fn cache_is_invisible() {
    let names: ImportSet = ["time.sleep", "json", "os.path", "numpy as np"]
        .into_iter()
        .map(String::from)
        .collect();

    let mut cached = ImportResolver::new(true);
    let mut uncached = ImportResolver::new(false);
    let first = cached.resolve_all(&names);
    assert_eq!(first, uncached.resolve_all(&names));
    assert_eq!(first, cached.resolve_all(&names));
    assert_eq!(
        first,
        vec!["import json", "import numpy as np", "from os import path", "from time import sleep"]
    );
}
