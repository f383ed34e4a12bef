/// Declares an error enum that can carry a stack of context frames.
///
/// `error` lists plain variants, `wrap` lists foreign errors converted through
/// `From`, and every `stack` entry becomes a constructor returning a closure
/// for `map_err`, so call sites read `.map_err(Error::OnSomething(&ctx))?`.
#[macro_export]
macro_rules! stack_error {
    (
        $(#[$meta:meta])*
        name: $name:ident,
        stack_name: $stack_ty_name:ident,
        error: {
            $($err_name:ident $(($($err_tuple:ty),*))? $( { $($err_field:ident : $err_field_type:ty),* } )? ),* $(,)*
        },
        stack: {
            $($stack_name:ident( $($stack_field:ident : $stack_field_type:ty),* ),)*
        }
    ) => {
        $crate::stack_error! {
            $(#[$meta])*
            name: $name,
            stack_name: $stack_ty_name,
            error: {
                $($err_name $(($($err_tuple),*))? $( { $($err_field : $err_field_type),* } )? ),*
            },
            wrap: {
            },
            stack: {
                $($stack_name( $($stack_field : $stack_field_type),* ),)*
            }
        }
    };
    (
        $(#[$meta:meta])*
        name: $name:ident,
        stack_name: $stack_ty_name:ident,
        error: {
            $($err_name:ident $(($($err_tuple:ty),*))? $( { $($err_field:ident : $err_field_type:ty),* } )? ),* $(,)*
        },
        wrap: {
            $($wrap_name:ident $(($wrap_ty:ty))? $( { format: $wrap_str_ty:ty } )? ),* $(,)*
        },
        stack: {
            $($stack_name:ident( $($stack_field:ident : $stack_field_type:ty),* ),)*
        }
    ) => {
        $(#[$meta])*
        pub enum $name {
            $(
                $err_name $(
                    ($($err_tuple),*)
                )? $(
                    { $($err_field : $err_field_type),* }
                )?,
            )*
            $(
                $wrap_name $(($wrap_ty))? $((#[doc = stringify!($wrap_str_ty)] String))?,
            )*
            Stack { origin: Box<$name>, stack: Vec<$stack_ty_name> },
        }

        #[derive(Debug, Clone, PartialEq)]
        pub enum $stack_ty_name {
            $(
                $stack_name {
                    $($stack_field : $stack_field_type),*
                },
            )*
        }

        $(
            $(
            impl From<$wrap_ty> for $name {
                fn from(val: $wrap_ty) -> Self {
                    Self::$wrap_name(val)
                }
            }
            )?
            $(
                impl From<$wrap_str_ty> for $name {
                    fn from(val: $wrap_str_ty) -> Self {
                        Self::$wrap_name(format!("{:?}", val))
                    }
                }
            )?
        )*

        impl $name {
            /// The innermost error, with every context frame peeled off.
            pub fn origin(&self) -> &Self {
                match self {
                    Self::Stack { origin, .. } => origin.origin(),
                    other => other,
                }
            }

            /// Context frames, innermost first.
            pub fn frames(&self) -> &[$stack_ty_name] {
                match self {
                    Self::Stack { stack, .. } => stack,
                    _ => &[],
                }
            }

            $(
            #[allow(non_snake_case)]
            pub fn $stack_name<'a, T>($($stack_field : &'a $stack_field_type),*) -> Box<dyn FnOnce(T) -> Self + 'a>
            where
                T: Into<Self>,
            {
                Box::new(move |origin| {
                    let stack_info = $stack_ty_name::$stack_name {
                        $($stack_field : $stack_field.clone() ),*
                    };
                    match origin.into() {
                        Self::Stack{origin, mut stack} => {
                            stack.push(stack_info);
                            Self::Stack{ origin, stack }
                        }
                        origin => Self::Stack {
                            origin: Box::new(origin),
                            stack: vec![stack_info],
                        }
                    }
                })
            }
            )*
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    Self::Stack { origin, stack } => write!(f, "{:?} (at {:?})", origin, stack),
                    other => write!(f, "{:?}", other),
                }
            }
        }

        impl std::error::Error for $name {}
    }
}

#[cfg(test)]
mod tests {
    crate::stack_error! {
        #[derive(Debug)]
        name: TestError,
        stack_name: TestErrorStack,
        error: {
            Missing { key: String },
        },
        wrap: {
            Parse(std::num::ParseIntError),
            Loose { format: std::fmt::Error },
        },
        stack: {
            OnLoad(path: String),
            OnRead(key: String),
        }
    }

    fn parse(s: &str) -> Result<u64, TestError> {
        Ok(s.parse::<u64>()?)
    }

    #[test]
    fn test_wrap_and_stack() {
        let path = "a.json".to_owned();
        let key = "k".to_owned();
        let err = parse("nope")
            .map_err(TestError::OnRead(&key))
            .map_err(TestError::OnLoad(&path))
            .unwrap_err();
        assert!(matches!(err.origin(), TestError::Parse(_)));
        assert_eq!(
            err.frames(),
            &[
                TestErrorStack::OnRead { key: key.clone() },
                TestErrorStack::OnLoad { path: path.clone() },
            ]
        );
    }

    #[test]
    fn test_plain_error_is_its_own_origin() {
        let err = TestError::Missing { key: "x".into() };
        assert!(matches!(err.origin(), TestError::Missing { .. }));
        assert!(err.frames().is_empty());
        assert_eq!(err.to_string(), r#"Missing { key: "x" }"#);

        let err: TestError = std::fmt::Error.into();
        assert!(matches!(err, TestError::Loose(ref s) if s == "Error"));
    }
}
