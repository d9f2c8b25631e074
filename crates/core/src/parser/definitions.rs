use super::Parser;
use crate::ast::{
    AssignmentNode, ConstDef, FieldDef, Location, MethodDef, OptionEntry, OptionsDef, ServiceDef,
    StructDef,
};
use crate::error::CompileError;
use crate::lexer::Token;

impl<'a> Parser<'a> {
    // -- const --------------------------------------------------

    pub(super) fn parse_const(&mut self, loc: Location) -> Result<ConstDef, CompileError> {
        self.advance();
        let (name, _) = self.take_ident()?;
        self.expect(Token::Eq, "'='")?;
        let value = self.parse_value()?;
        Ok(ConstDef { name, value, loc })
    }

    // -- struct -------------------------------------------------

    pub(super) fn parse_struct(&mut self, loc: Location) -> Result<StructDef, CompileError> {
        self.advance();
        let (name, _) = self.take_ident()?;
        self.expect(Token::LBrace, "'{'")?;
        if self.peek() == &Token::RBrace {
            return Err(self.err(format!("struct '{}' must declare at least one field", name)));
        }
        let mut fields = Vec::new();
        loop {
            fields.push(self.parse_field()?);
            self.skip_comma();
            if self.peek() == &Token::RBrace {
                break;
            }
        }
        self.advance();
        Ok(StructDef { name, fields, loc })
    }

    fn parse_field(&mut self) -> Result<FieldDef, CompileError> {
        let (name, loc) = self.take_ident()?;
        self.expect(Token::Colon, "':'")?;
        let type_ = self.parse_typename()?;
        let assignment = if self.peek() == &Token::Eq {
            self.advance();
            Some(self.parse_assignment()?)
        } else {
            None
        };
        Ok(FieldDef {
            name,
            type_,
            assignment,
            loc,
        })
    }

    fn parse_assignment(&mut self) -> Result<AssignmentNode, CompileError> {
        if matches!(self.peek(), Token::Ident(_)) {
            let (name, loc) = self.take_ident()?;
            return Ok(AssignmentNode::Constant { name, loc });
        }
        Ok(AssignmentNode::Value(self.parse_value()?))
    }

    // -- service ------------------------------------------------

    pub(super) fn parse_service(&mut self, loc: Location) -> Result<ServiceDef, CompileError> {
        self.advance();
        let (name, _) = self.take_ident()?;
        self.expect(Token::LBrace, "'{'")?;
        if self.peek() == &Token::RBrace {
            return Err(self.err(format!(
                "service '{}' must declare at least one method",
                name
            )));
        }
        let mut methods = Vec::new();
        loop {
            methods.push(self.parse_method()?);
            self.skip_comma();
            if self.peek() == &Token::RBrace {
                break;
            }
        }
        self.advance();
        Ok(ServiceDef { name, methods, loc })
    }

    fn parse_method(&mut self) -> Result<MethodDef, CompileError> {
        let (name, loc) = self.take_ident()?;
        self.expect(Token::Colon, "':'")?;
        let (request, _) = self.take_ident()?;
        self.expect(Token::Arrow, "'->'")?;
        let (response, _) = self.take_ident()?;
        Ok(MethodDef {
            name,
            request,
            response,
            loc,
        })
    }

    // -- options ------------------------------------------------

    pub(super) fn parse_options(&mut self, loc: Location) -> Result<OptionsDef, CompileError> {
        self.advance();
        self.expect(Token::LBrace, "'{'")?;
        if self.peek() == &Token::RBrace {
            return Err(self.err("options block must declare at least one option"));
        }
        let mut entries = Vec::new();
        while self.peek() != &Token::RBrace {
            let (key, entry_loc) = self.take_ident()?;
            self.expect(Token::Eq, "'='")?;
            let value = self.take_str()?;
            entries.push(OptionEntry {
                key,
                value,
                loc: entry_loc,
            });
            self.skip_comma();
        }
        self.advance();
        Ok(OptionsDef { entries, loc })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parser::parse_source;

    fn only_struct(src: &str) -> StructDef {
        match parse_source(src).expect("should parse").remove(0) {
            Definition::Struct(s) => s,
            other => panic!("expected struct, got {:?}", other),
        }
    }

    #[test]
    fn struct_fields_keep_declaration_order() {
        let s = only_struct("struct User {\n  id: uint64_t\n  name: string\n  age: uint8_t = 18\n}");
        let names: Vec<&str> = s.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name", "age"]);
        assert_eq!(s.fields[1].loc, Location::new(3, 3));
        assert!(s.fields[2].assignment.is_some());
    }

    #[test]
    fn vector_typename_with_literal_and_constant_length() {
        let s = only_struct("struct V { a: vector<uint8_t>(16) b: vector<Point>(N) c: vector<string> }");
        assert_eq!(
            s.fields[0].type_,
            TypeNode::Vector {
                element: "uint8_t".into(),
                length: Some(LengthNode::Literal {
                    value: 16,
                    loc: Location::new(1, 31)
                }),
            }
        );
        match &s.fields[1].type_ {
            TypeNode::Vector {
                element,
                length: Some(LengthNode::Constant { name, .. }),
            } => {
                assert_eq!(element, "Point");
                assert_eq!(name, "N");
            }
            other => panic!("unexpected type {:?}", other),
        }
        assert_eq!(
            s.fields[2].type_,
            TypeNode::Vector {
                element: "string".into(),
                length: None
            }
        );
    }

    #[test]
    fn struct_named_vector_is_a_simple_type() {
        let s = only_struct("struct W { v: vector }");
        assert_eq!(s.fields[0].type_, TypeNode::Simple("vector".into()));
    }

    #[test]
    fn assignment_by_constant_name() {
        let s = only_struct("struct D { n: int32_t = DEFAULT_N }");
        match &s.fields[0].assignment {
            Some(AssignmentNode::Constant { name, .. }) => assert_eq!(name, "DEFAULT_N"),
            other => panic!("unexpected assignment {:?}", other),
        }
    }

    #[test]
    fn service_methods_parse_in_order() {
        let defs = parse_source("service Users {\n  get: GetReq -> GetResp\n  put: PutReq -> PutResp\n}")
            .unwrap();
        let Definition::Service(svc) = &defs[0] else {
            panic!("expected service");
        };
        assert_eq!(svc.methods.len(), 2);
        assert_eq!(svc.methods[0].name, "get");
        assert_eq!(svc.methods[0].request, "GetReq");
        assert_eq!(svc.methods[1].response, "PutResp");
    }

    #[test]
    fn empty_bodies_are_rejected() {
        assert!(parse_source("struct E {}").is_err());
        assert!(parse_source("service S {}").is_err());
        assert!(parse_source("options {}").is_err());
    }

    #[test]
    fn option_values_must_be_strings() {
        let err = parse_source("options { namespace = 5 }").unwrap_err();
        assert!(err.message.contains("expected string literal"), "{}", err.message);
    }

    #[test]
    fn method_without_arrow_is_rejected() {
        let err = parse_source("service S { m: A B }").unwrap_err();
        assert_eq!(err.message, "expected '->', got 'B'");
    }
}
